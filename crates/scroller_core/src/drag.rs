use crate::geometry::Point;

/// Panel drag by its header. `dragging` is checked on every move, so an
/// ended drag silently ignores late pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    dragging: bool,
    offset: Point,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Starts a drag unless the pointer went down on a button inside the header.
    pub fn begin(&mut self, pointer: Point, panel_origin: Point, on_button: bool) -> bool {
        if on_button {
            return false;
        }
        self.dragging = true;
        self.offset = Point::new(pointer.x - panel_origin.x, pointer.y - panel_origin.y);
        true
    }

    /// New panel origin for this pointer position, clamped to the viewport's
    /// top-left corner.
    pub fn move_to(&self, pointer: Point) -> Option<Point> {
        if !self.dragging {
            return None;
        }
        Some(Point::new(
            (pointer.x - self.offset.x).max(0.0),
            (pointer.y - self.offset.y).max(0.0),
        ))
    }

    pub fn end(&mut self) {
        self.dragging = false;
    }
}
