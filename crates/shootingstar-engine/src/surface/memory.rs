//! Headless surface keeping everything in memory.

use super::{Element, ElementHandle, ElementId, ElementStore, ElementStyle, RenderSurface, SurfaceBounds};
use crate::error::{EngineError, Result};

/// Something the engine did to a [`MemorySurface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    Created(ElementId),
    Removed(ElementId),
    Styled(ElementId, ElementStyle),
}

/// A surface without any output, recording every operation.
///
/// Fully transparent elements are kept until [`MemorySurface::reclaim`] or
/// [`MemorySurface::collect_garbage`] drops them.
#[derive(Debug)]
pub struct MemorySurface {
    bounds: SurfaceBounds,
    store: ElementStore,
    events: Vec<SurfaceEvent>,
}

impl MemorySurface {
    /// Create a surface of `width` x `height` virtual pixels.
    ///
    /// A zero extent makes [`RenderSurface::dimensions`] fail.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bounds: SurfaceBounds { width, height },
            store: ElementStore::default(),
            events: Vec::new(),
        }
    }

    /// Look at a live element.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.store.get(id)
    }

    /// Every live element, oldest first.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.store.iter()
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Every operation since creation or the last [`MemorySurface::take_events`].
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Drain the recorded operations.
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop an element behind the engine's back, without recording an event.
    pub fn reclaim(&mut self, id: ElementId) -> bool {
        self.store.remove(id)
    }

    /// Drop every element that can no longer be seen.
    pub fn collect_garbage(&mut self) -> usize {
        self.store.retain(|element| !element.is_invisible())
    }
}

impl RenderSurface for MemorySurface {
    fn dimensions(&self) -> Result<SurfaceBounds> {
        if self.bounds.width == 0 || self.bounds.height == 0 {
            return Err(EngineError::SurfaceUnavailable(format!(
                "surface is {}x{}",
                self.bounds.width, self.bounds.height
            )));
        }
        Ok(self.bounds)
    }

    fn create_element(&mut self, id: ElementId) -> ElementHandle {
        self.events.push(SurfaceEvent::Created(id));
        self.store.create(id)
    }

    fn remove_element(&mut self, id: ElementId) {
        if self.store.remove(id) {
            self.events.push(SurfaceEvent::Removed(id));
        }
    }

    fn set_style(&mut self, handle: ElementHandle, style: ElementStyle) {
        if let Some(id) = self.store.apply(handle, style) {
            self.events.push(SurfaceEvent::Styled(id, style));
        }
    }

    fn lookup_element(&self, id: ElementId) -> Option<ElementHandle> {
        self.store.lookup(id)
    }
}
