use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: Vec2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle. `min` is (xMin, yMin), `max` is (xMax, yMax).
///
/// A rectangle with zero width or height is valid; only an empty accumulator
/// (see [`BBox2::empty`]) has `min > max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl BBox2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Builds a rectangle from axis limits in `(xMin, xMax, yMin, yMax)` order.
    ///
    /// Reversed limits (an inverted axis) are swapped so `min <= max` holds.
    pub fn from_limits(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            min: Vec2::new(x_min.min(x_max), y_min.min(y_max)),
            max: Vec2::new(x_min.max(x_max), y_min.max(y_max)),
        }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn x_min(&self) -> f64 {
        self.min.x
    }

    pub fn x_max(&self) -> f64 {
        self.max.x
    }

    pub fn y_min(&self) -> f64 {
        self.min.y
    }

    pub fn y_max(&self) -> f64 {
        self.max.y
    }

    /// Zero width or zero height.
    pub fn is_degenerate(&self) -> bool {
        !self.is_empty() && (self.min.x == self.max.x || self.min.y == self.max.y)
    }

    pub fn include_point(&mut self, point: Vec2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.min.x + self.max.x) * 0.5, (self.min.y + self.max.y) * 0.5)
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }

    /// True when `point` lies inside or on the boundary, allowing `tol` slack.
    pub fn contains(&self, point: Vec2, tol: f64) -> bool {
        point.x >= self.min.x - tol
            && point.x <= self.max.x + tol
            && point.y >= self.min.y - tol
            && point.y <= self.max.y + tol
    }

    /// Grows each axis by `frac` of its span, but never by less than `min_padding`.
    pub fn padded(&self, frac: f64, min_padding: f64) -> Self {
        let px = (self.width() * frac).max(min_padding);
        let py = (self.height() * frac).max(min_padding);
        Self {
            min: Vec2::new(self.min.x - px, self.min.y - py),
            max: Vec2::new(self.max.x + px, self.max.y + py),
        }
    }
}
