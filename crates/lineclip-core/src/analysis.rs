use crate::clip::ClipError;
use crate::fit::{fit_viewport, FitConfig};
use crate::geom::BBox2;
use crate::model::PointSet;
use crate::report::{ClipReport, LineReport, StatsReport, Warning};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub fit: FitConfig,
    /// Slack, relative to the viewport size, when testing whether the clipped
    /// endpoints land on the finite rectangle.
    pub containment_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fit: FitConfig::default(),
            containment_tolerance: 1e-9,
        }
    }
}

pub struct Analyzer {
    cfg: AnalysisConfig,
}

impl Analyzer {
    pub fn new(cfg: AnalysisConfig) -> Self {
        Self { cfg }
    }

    /// Clips the set's line to `viewport`, or to the fitted viewport when none
    /// is given.
    pub fn analyze(
        &self,
        points: &PointSet,
        viewport: Option<BBox2>,
    ) -> Result<ClipReport, ClipError> {
        let line = points.line()?;
        let viewport = viewport.unwrap_or_else(|| fit_viewport(points, &self.cfg.fit));
        let clipped = line.clip_detailed(&viewport);

        let mut warnings = Vec::new();
        if points.points.is_empty() {
            warnings.push(Warning {
                code: "no_points".to_string(),
                message: "No sample points; viewport fitted to the line points.".to_string(),
            });
        }
        if viewport.is_degenerate() {
            warnings.push(Warning {
                code: "degenerate_viewport".to_string(),
                message: "Viewport has zero width or height; the segment may have zero length."
                    .to_string(),
            });
        }
        let scale = viewport.width().max(viewport.height()).max(1.0);
        let tol = self.cfg.containment_tolerance * scale;
        if !clipped.segment.within(&viewport, tol) {
            warnings.push(Warning {
                code: "line_misses_viewport".to_string(),
                message: "The line does not cross the visible rectangle; endpoints lie on the extended boundary lines."
                    .to_string(),
            });
        }
        for w in &warnings {
            warn!(code = %w.code, "{}", w.message);
        }

        let inliers = points.inliers().count();
        Ok(ClipReport {
            line: LineReport {
                p0: line.p0(),
                p1: line.p1(),
                coefficients: line.coefficients(),
            },
            viewport,
            axis: clipped.axis,
            segment: clipped.segment,
            stats: StatsReport {
                points_total: points.points.len(),
                inliers,
                outliers: points.points.len() - inliers,
            },
            warnings,
        })
    }
}

pub fn build_clip_report(points: &PointSet, viewport: BBox2) -> Result<ClipReport, ClipError> {
    Analyzer::new(AnalysisConfig::default()).analyze(points, Some(viewport))
}
