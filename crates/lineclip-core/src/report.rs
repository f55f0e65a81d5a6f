use crate::clip::{ClipAxis, Segment};
use crate::geom::{BBox2, Vec2};
use crate::homogeneous::LineCoefficients;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineReport {
    pub p0: Vec2,
    pub p1: Vec2,
    pub coefficients: LineCoefficients,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    pub points_total: usize,
    pub inliers: usize,
    pub outliers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipReport {
    pub line: LineReport,
    pub viewport: BBox2,
    pub axis: ClipAxis,
    pub segment: Segment,
    pub stats: StatsReport,
    pub warnings: Vec<Warning>,
}
