//! Clipping an infinite line to the boundary of an axis-aligned rectangle.
//!
//! The line is kept in implicit form `nx * x + ny * y + nz = 0`. Each endpoint
//! is the meet of that line with one boundary line of the rectangle, and the
//! only division happens when the result is dehomogenized. The boundary pair
//! is picked so that the divisor is the larger of `|nx|` and `|ny|`.

use crate::geom::{BBox2, Vec2};
use crate::homogeneous::LineCoefficients;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only way clipping can fail: no line passes through the given points.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ClipError {
    #[error("line is undefined: both defining points are ({}, {})", .point.x, .point.y)]
    DegenerateLine { point: Vec2 },
}

/// Which pair of rectangle edges the line is intersected with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipAxis {
    /// `x = xMin` and `x = xMax`; divides by `ny`.
    VerticalEdges,
    /// `y = yMin` and `y = yMax`; divides by `nx`.
    HorizontalEdges,
}

impl ClipAxis {
    pub fn select(line: &LineCoefficients) -> Self {
        if line.ny.abs() > line.nx.abs() {
            ClipAxis::VerticalEdges
        } else {
            ClipAxis::HorizontalEdges
        }
    }

    /// The two boundary values used for this axis, first boundary first.
    pub fn limits(&self, rect: &BBox2) -> (f64, f64) {
        match self {
            ClipAxis::VerticalEdges => (rect.x_min(), rect.x_max()),
            ClipAxis::HorizontalEdges => (rect.y_min(), rect.y_max()),
        }
    }

    fn edge(&self, v: f64) -> LineCoefficients {
        match self {
            ClipAxis::VerticalEdges => LineCoefficients::vertical_edge(v),
            ClipAxis::HorizontalEdges => LineCoefficients::horizontal_edge(v),
        }
    }

    /// Meets `line` with the edge at `v` and dehomogenizes. The coordinate fixed
    /// by the edge is set to `v` itself so the endpoint sits exactly on it.
    fn endpoint(&self, line: &LineCoefficients, v: f64) -> Vec2 {
        let Some(p) = line.meet(&self.edge(v)).dehomogenize() else {
            // w is -ny or nx, whichever select() found larger; both are zero
            // only for a degenerate line, which InfiniteLine::new rejects.
            unreachable!("clip denominator vanished for a validated line");
        };
        match self {
            ClipAxis::VerticalEdges => Vec2::new(v, p.y),
            ClipAxis::HorizontalEdges => Vec2::new(p.x, v),
        }
    }
}

/// Visible portion of an [`InfiniteLine`]. `a` lies on the first boundary of
/// the chosen [`ClipAxis`], `b` on the second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }

    /// True when both endpoints lie on the finite rectangle (within `tol`).
    ///
    /// Clipping targets the infinite boundary lines, so a line that misses the
    /// rectangle still yields a segment; this is how callers detect that case.
    pub fn within(&self, rect: &BBox2, tol: f64) -> bool {
        rect.contains(self.a, tol) && rect.contains(self.b, tol)
    }
}

/// Result of a clip together with the branch that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clipped {
    pub segment: Segment,
    pub axis: ClipAxis,
    /// The line coefficient the homogeneous endpoints were divided by.
    pub denominator: f64,
}

/// Infinite line through two distinct points. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InfiniteLine {
    p0: Vec2,
    p1: Vec2,
    coefficients: LineCoefficients,
}

impl InfiniteLine {
    pub fn new(p0: Vec2, p1: Vec2) -> Result<Self, ClipError> {
        let coefficients = LineCoefficients::through(p0, p1);
        if coefficients.is_degenerate() {
            return Err(ClipError::DegenerateLine { point: p0 });
        }
        Ok(Self {
            p0,
            p1,
            coefficients,
        })
    }

    pub fn p0(&self) -> Vec2 {
        self.p0
    }

    pub fn p1(&self) -> Vec2 {
        self.p1
    }

    pub fn coefficients(&self) -> LineCoefficients {
        self.coefficients
    }

    pub fn axis(&self) -> ClipAxis {
        ClipAxis::select(&self.coefficients)
    }

    pub fn clip(&self, rect: &BBox2) -> Segment {
        self.clip_detailed(rect).segment
    }

    pub fn clip_detailed(&self, rect: &BBox2) -> Clipped {
        let line = self.coefficients;
        let axis = ClipAxis::select(&line);
        let (first, second) = axis.limits(rect);
        let denominator = match axis {
            ClipAxis::VerticalEdges => line.ny,
            ClipAxis::HorizontalEdges => line.nx,
        };
        Clipped {
            segment: Segment::new(axis.endpoint(&line, first), axis.endpoint(&line, second)),
            axis,
            denominator,
        }
    }
}

/// Clips the infinite line through `p0` and `p1` to the boundary lines of `rect`.
pub fn clip(p0: Vec2, p1: Vec2, rect: &BBox2) -> Result<Segment, ClipError> {
    Ok(InfiniteLine::new(p0, p1)?.clip(rect))
}

pub fn clip_detailed(p0: Vec2, p1: Vec2, rect: &BBox2) -> Result<Clipped, ClipError> {
    Ok(InfiniteLine::new(p0, p1)?.clip_detailed(rect))
}
