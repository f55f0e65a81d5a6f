//! Projective-plane primitives.
//!
//! Points and lines of the plane are both 3-vectors up to scale. A line through
//! two points is the cross product of their lifts, and the intersection of two
//! lines is the cross product of their coefficient vectors.

use crate::geom::Vec2;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Homogeneous triple `(x, y, w)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homogeneous(pub Vector3<f64>);

impl Homogeneous {
    pub fn new(x: f64, y: f64, w: f64) -> Self {
        Self(Vector3::new(x, y, w))
    }

    /// Lifts an affine point to `(x, y, 1)`.
    pub fn lift(p: Vec2) -> Self {
        Self::new(p.x, p.y, 1.0)
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn w(&self) -> f64 {
        self.0.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self(self.0.cross(&other.0))
    }

    pub fn is_zero(&self) -> bool {
        self.0.x == 0.0 && self.0.y == 0.0 && self.0.z == 0.0
    }

    /// `(x / w, y / w)`, or `None` for a point at infinity.
    pub fn dehomogenize(&self) -> Option<Vec2> {
        let w = self.w();
        if w == 0.0 {
            return None;
        }
        Some(Vec2::new(self.x() / w, self.y() / w))
    }
}

/// Implicit line `nx * x + ny * y + nz = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineCoefficients {
    pub nx: f64,
    pub ny: f64,
    pub nz: f64,
}

impl LineCoefficients {
    pub const fn new(nx: f64, ny: f64, nz: f64) -> Self {
        Self { nx, ny, nz }
    }

    /// Line through two affine points. All-zero normal when `p0 == p1`.
    pub fn through(p0: Vec2, p1: Vec2) -> Self {
        Homogeneous::lift(p0).cross(&Homogeneous::lift(p1)).into()
    }

    /// The boundary line `x = v`.
    pub fn vertical_edge(v: f64) -> Self {
        Self::new(1.0, 0.0, -v)
    }

    /// The boundary line `y = v`.
    pub fn horizontal_edge(v: f64) -> Self {
        Self::new(0.0, 1.0, -v)
    }

    /// No line equation exists when the normal `(nx, ny)` vanishes.
    pub fn is_degenerate(&self) -> bool {
        self.nx == 0.0 && self.ny == 0.0
    }

    /// Algebraic residual of `point`; zero when the point is on the line.
    pub fn eval(&self, point: Vec2) -> f64 {
        self.nx * point.x + self.ny * point.y + self.nz
    }

    /// Homogeneous intersection point of two lines.
    pub fn meet(&self, other: &Self) -> Homogeneous {
        Homogeneous::from(*self).cross(&Homogeneous::from(*other))
    }

    pub fn negated(&self) -> Self {
        Self::new(-self.nx, -self.ny, -self.nz)
    }
}

impl From<Homogeneous> for LineCoefficients {
    fn from(h: Homogeneous) -> Self {
        Self::new(h.x(), h.y(), h.w())
    }
}

impl From<LineCoefficients> for Homogeneous {
    fn from(l: LineCoefficients) -> Self {
        Self::new(l.nx, l.ny, l.nz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_through_diagonal() {
        let l = LineCoefficients::through(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        assert_eq!(LineCoefficients::new(-1.0, 1.0, 0.0), l);
        assert_eq!(0.0, l.eval(Vec2::new(7.0, 7.0)));
    }

    #[test]
    fn coincident_points_give_zero_normal() {
        let p = Vec2::new(2.0, 3.0);
        let l = LineCoefficients::through(p, p);
        assert!(l.is_degenerate());
        assert!(Homogeneous::from(l).is_zero());
    }

    #[test]
    fn meet_of_parallel_lines_is_at_infinity() {
        let a = LineCoefficients::vertical_edge(1.0);
        let b = LineCoefficients::vertical_edge(2.0);
        assert_eq!(None, a.meet(&b).dehomogenize());
    }

    #[test]
    fn meet_of_edges_is_corner() {
        let x = LineCoefficients::vertical_edge(3.0);
        let y = LineCoefficients::horizontal_edge(-4.0);
        assert_eq!(Some(Vec2::new(3.0, -4.0)), x.meet(&y).dehomogenize());
    }
}
