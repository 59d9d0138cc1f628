//! Terminal surface rendered through ratatui.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use super::{Element, ElementHandle, ElementId, ElementStore, ElementStyle, Point, RenderSurface, SurfaceBounds};
use crate::chars::glyph_for_size;
use crate::error::{EngineError, Result};

/// A character grid exposing a virtual pixel space.
///
/// Each terminal cell covers `cell_width` x `cell_height` virtual pixels.
/// Elements outside the grid are kept but not drawn.
#[derive(Debug)]
pub struct TerminalSurface {
    store: ElementStore,
    columns: u16,
    rows: u16,
    cell_width: u32,
    cell_height: u32,
}

impl TerminalSurface {
    /// Create a surface for a terminal of `columns` x `rows` cells.
    pub fn new(columns: u16, rows: u16, cell_width: u32, cell_height: u32) -> Self {
        Self {
            store: ElementStore::default(),
            columns,
            rows,
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
        }
    }

    /// Follow a terminal resize.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Drop every element that can no longer be seen.
    pub fn collect_garbage(&mut self) -> usize {
        self.store.retain(|element| !element.is_invisible())
    }

    /// Cell covering a virtual pixel position, if it lies on the grid.
    fn cell_of(&self, position: Point) -> Option<(u16, u16)> {
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        let column = (position.x / self.cell_width as f32) as u32;
        let row = (position.y / self.cell_height as f32) as u32;
        if column >= u32::from(self.columns) || row >= u32::from(self.rows) {
            return None;
        }
        Some((column as u16, row as u16))
    }

    fn draw(&self, element: &Element, area: Rect, buf: &mut Buffer) {
        if element.is_invisible() {
            return;
        }
        let Some((column, row)) = self.cell_of(element.position) else {
            return;
        };
        if column >= area.width || row >= area.height {
            return;
        }
        if let Some(cell) = buf.cell_mut((area.x + column, area.y + row)) {
            cell.set_char(glyph_for_size(element.size))
                .set_fg(element.color.over_black(element.opacity));
        }
    }
}

impl RenderSurface for TerminalSurface {
    fn dimensions(&self) -> Result<SurfaceBounds> {
        if self.columns == 0 || self.rows == 0 {
            return Err(EngineError::SurfaceUnavailable(
                "terminal has no visible area".to_string(),
            ));
        }
        Ok(SurfaceBounds {
            width: u32::from(self.columns) * self.cell_width,
            height: u32::from(self.rows) * self.cell_height,
        })
    }

    fn create_element(&mut self, id: ElementId) -> ElementHandle {
        self.store.create(id)
    }

    fn remove_element(&mut self, id: ElementId) {
        self.store.remove(id);
    }

    fn set_style(&mut self, handle: ElementHandle, style: ElementStyle) {
        self.store.apply(handle, style);
    }

    fn lookup_element(&self, id: ElementId) -> Option<ElementHandle> {
        self.store.lookup(id)
    }
}

impl Widget for &TerminalSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for element in self.store.iter() {
            self.draw(element, area, buf);
        }
    }
}
