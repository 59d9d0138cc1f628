//! The rendering surface the engine draws on.
//!
//! The engine only ever creates, styles and removes elements it owns. Every
//! element is addressed by an [`ElementId`] combining the per-launch
//! [`InstanceToken`] with a recycled slot, so overlapping stars never collide.

mod memory;
mod terminal;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub use memory::{MemorySurface, SurfaceEvent};
pub use terminal::TerminalSurface;

use crate::color::Rgba;
use crate::error::Result;
use crate::options::InstanceToken;

/// Size of the surface in virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceBounds {
    pub width: u32,
    pub height: u32,
}

/// A position on the surface in virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Identifier of an element owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId {
    /// Star the element belongs to.
    pub token: InstanceToken,
    /// Recycled slot in `[1, 100]`.
    pub slot: u8,
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "star{}_{}", self.slot, self.token)
    }
}

/// Opaque handle to a live element, handed out by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub u64);

/// A partial style update. `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementStyle {
    pub position: Option<Point>,
    pub size: Option<u32>,
    pub color: Option<Rgba>,
    pub opacity: Option<f32>,
}

impl ElementStyle {
    /// Full style of a freshly placed segment.
    pub fn placed(position: Point, size: u32, color: Rgba) -> Self {
        Self {
            position: Some(position),
            size: Some(size),
            color: Some(color),
            opacity: Some(1.0),
        }
    }

    /// Only change the color.
    pub fn color(color: Rgba) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    /// Only change the opacity.
    pub fn opacity(opacity: f32) -> Self {
        Self {
            opacity: Some(opacity),
            ..Self::default()
        }
    }
}

/// Sink the engine renders into.
pub trait RenderSurface {
    /// Current size of the surface.
    fn dimensions(&self) -> Result<SurfaceBounds>;

    /// Create a new element. An existing element with the same id is replaced.
    fn create_element(&mut self, id: ElementId) -> ElementHandle;

    /// Remove an element. Unknown ids are ignored.
    fn remove_element(&mut self, id: ElementId);

    /// Apply a style update. Stale handles are ignored.
    fn set_style(&mut self, handle: ElementHandle, style: ElementStyle);

    /// Find a live element by id.
    fn lookup_element(&self, id: ElementId) -> Option<ElementHandle>;
}

/// A live element with its current style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub position: Point,
    pub size: u32,
    pub color: Rgba,
    pub opacity: f32,
}

impl Element {
    fn new(id: ElementId) -> Self {
        Self {
            id,
            position: Point::default(),
            size: 0,
            color: Rgba::opaque(255, 255, 255),
            opacity: 1.0,
        }
    }

    fn apply(&mut self, style: ElementStyle) {
        if let Some(position) = style.position {
            self.position = position;
        }
        if let Some(size) = style.size {
            self.size = size;
        }
        if let Some(color) = style.color {
            self.color = color;
        }
        if let Some(opacity) = style.opacity {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// Whether the element can no longer be seen.
    pub fn is_invisible(&self) -> bool {
        self.opacity <= 0.0 || self.color.a <= 0.0
    }
}

/// Element bookkeeping shared by the surface implementations.
///
/// Elements are kept in creation order so later ones draw on top.
#[derive(Debug, Default)]
struct ElementStore {
    next_handle: u64,
    handles: HashMap<ElementId, ElementHandle>,
    elements: BTreeMap<ElementHandle, Element>,
}

impl ElementStore {
    fn create(&mut self, id: ElementId) -> ElementHandle {
        self.remove(id);
        self.next_handle += 1;
        let handle = ElementHandle(self.next_handle);
        self.handles.insert(id, handle);
        self.elements.insert(handle, Element::new(id));
        handle
    }

    fn remove(&mut self, id: ElementId) -> bool {
        match self.handles.remove(&id) {
            Some(handle) => self.elements.remove(&handle).is_some(),
            None => false,
        }
    }

    fn apply(&mut self, handle: ElementHandle, style: ElementStyle) -> Option<ElementId> {
        let element = self.elements.get_mut(&handle)?;
        element.apply(style);
        Some(element.id)
    }

    fn lookup(&self, id: ElementId) -> Option<ElementHandle> {
        self.handles.get(&id).copied()
    }

    fn get(&self, id: ElementId) -> Option<&Element> {
        self.lookup(id).and_then(|handle| self.elements.get(&handle))
    }

    fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    fn len(&self) -> usize {
        self.elements.len()
    }

    /// Drop every element for which `keep` returns false, returning how many went.
    fn retain(&mut self, mut keep: impl FnMut(&Element) -> bool) -> usize {
        let before = self.elements.len();
        let handles = &mut self.handles;
        self.elements.retain(|_, element| {
            let kept = keep(element);
            if !kept {
                handles.remove(&element.id);
            }
            kept
        });
        before - self.elements.len()
    }
}
