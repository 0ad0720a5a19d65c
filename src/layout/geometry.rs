//! Page geometry in millimetres.

/// Fixed page size and margin shared by every page of a report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl PageGeometry {
    /// A4 portrait with a 20 mm margin on all sides.
    pub const A4: PageGeometry = PageGeometry {
        width: 210.0,
        height: 297.0,
        margin: 20.0,
    };

    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Width between the side margins.
    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    /// Vertical offset of the first usable line.
    pub fn content_top(&self) -> f64 {
        self.margin
    }

    /// Vertical offset below which nothing may be drawn.
    pub fn content_bottom(&self) -> f64 {
        self.height - self.margin
    }

    /// Height between the top and bottom margins.
    pub fn content_height(&self) -> f64 {
        self.content_bottom() - self.content_top()
    }

    /// The usable area of a page.
    pub fn content_area(&self) -> Rect {
        Rect::new(
            self.margin,
            self.content_top(),
            self.content_width(),
            self.content_height(),
        )
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Axis-aligned rectangle with its origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Tolerance used by containment checks.
    const EPSILON: f64 = 1e-6;

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns whether `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x - Self::EPSILON
            && other.y >= self.y - Self::EPSILON
            && other.right() <= self.right() + Self::EPSILON
            && other.bottom() <= self.bottom() + Self::EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_content_area() {
        let geometry = PageGeometry::A4;
        assert_eq!(geometry.content_width(), 170.0);
        assert_eq!(geometry.content_bottom(), 277.0);
        assert_eq!(geometry.content_height(), 257.0);
    }

    #[test]
    fn containment_is_inclusive() {
        let outer = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(outer.contains(&Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(outer.contains(&Rect::new(2.0, 2.0, 3.0, 3.0)));
        assert!(!outer.contains(&Rect::new(8.0, 8.0, 3.0, 1.0)));
    }
}
