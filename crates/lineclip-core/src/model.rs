use crate::clip::{ClipError, InfiniteLine};
use crate::geom::{BBox2, Vec2};
use serde::{Deserialize, Serialize};

/// Status value marking an inlier; every other value is an outlier.
pub const INLIER_STATUS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub pos: Vec2,
    pub status: i64,
}

impl PointRecord {
    pub const fn new(pos: Vec2, status: i64) -> Self {
        Self { pos, status }
    }

    pub fn is_inlier(&self) -> bool {
        self.status == INLIER_STATUS
    }
}

/// A fitted line (as two points) together with the classified samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    pub p0: Vec2,
    pub p1: Vec2,
    pub points: Vec<PointRecord>,
}

impl PointSet {
    pub fn line(&self) -> Result<InfiniteLine, ClipError> {
        InfiniteLine::new(self.p0, self.p1)
    }

    pub fn inliers(&self) -> impl Iterator<Item = &PointRecord> + '_ {
        self.points.iter().filter(|p| p.is_inlier())
    }

    pub fn outliers(&self) -> impl Iterator<Item = &PointRecord> + '_ {
        self.points.iter().filter(|p| !p.is_inlier())
    }

    /// Bounds of the sample points, or of the two line points when there are
    /// no samples.
    pub fn extents(&self) -> BBox2 {
        let mut bbox = BBox2::empty();
        for p in &self.points {
            if p.pos.is_finite() {
                bbox.include_point(p.pos);
            }
        }
        if bbox.is_empty() {
            bbox.include_point(self.p0);
            bbox.include_point(self.p1);
        }
        bbox
    }
}
