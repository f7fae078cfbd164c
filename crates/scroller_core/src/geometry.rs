/// Vertical extent of an element in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Strict overlap: touching edges do not count as visible.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.bottom > other.top && self.top < other.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Scroll geometry of a scrollable element, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// True when the visible window ends within `slack` pixels of the content end.
    pub fn at_end(&self, slack: f64) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - slack
    }
}
