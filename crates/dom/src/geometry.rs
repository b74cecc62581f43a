//! Axis-aligned rectangles in CSS pixels.

/// Rectangle representing position and size.
///
/// Whether the origin is the viewport or the page depends on where the rectangle
/// came from; [`crate::Document::bounding_client_rect`] is viewport relative and
/// [`crate::Document::page_bounds`] is page relative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn top(&self) -> f64 {
        self.y
    }

    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Get the right edge (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom edge (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if this rectangle contains a point. All four edges are inclusive.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Return the same rectangle shifted by the given offsets.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::Rect;

    #[test]
    fn edges_are_inclusive() {
        let rect = Rect::new(20.0, 50.0, 100.0, 40.0);
        assert!(rect.contains_point(20.0, 50.0));
        assert!(rect.contains_point(120.0, 90.0));
        assert!(rect.contains_point(120.0, 50.0));
        assert!(!rect.contains_point(120.5, 60.0));
        assert!(!rect.contains_point(19.99, 60.0));
        assert!(!rect.contains_point(70.0, 90.01));
    }

    #[test]
    fn translation_keeps_size() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0).translated(10.0, 20.0);
        assert_eq!(rect, Rect::new(11.0, 22.0, 3.0, 4.0));
    }
}
