use crate::geom::BBox2;
use crate::model::PointSet;

#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Fraction of the data span added on every side.
    pub margin_frac: f64,
    /// Lower bound on the padding, so single-valued axes still get a span.
    pub min_span: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            margin_frac: 0.05,
            min_span: 1e-9,
        }
    }
}

/// Initial viewport for a point set: its extents plus a margin.
pub fn fit_viewport(points: &PointSet, cfg: &FitConfig) -> BBox2 {
    let extents = points.extents();
    let min_padding = cfg.min_span * 0.5;
    extents.padded(cfg.margin_frac.max(0.0), min_padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vec2;
    use crate::model::PointRecord;

    #[test]
    fn fits_samples_not_line_points() {
        let set = PointSet {
            p0: Vec2::new(-100.0, -100.0),
            p1: Vec2::new(100.0, 100.0),
            points: vec![
                PointRecord::new(Vec2::new(0.0, 0.0), 1),
                PointRecord::new(Vec2::new(10.0, 20.0), 0),
            ],
        };
        let vp = fit_viewport(&set, &FitConfig::default());
        assert_eq!(-0.5, vp.x_min());
        assert_eq!(10.5, vp.x_max());
        assert_eq!(-1.0, vp.y_min());
        assert_eq!(21.0, vp.y_max());
    }

    #[test]
    fn empty_set_falls_back_to_line_points() {
        let set = PointSet {
            p0: Vec2::new(1.0, 1.0),
            p1: Vec2::new(1.0, 3.0),
            points: Vec::new(),
        };
        let vp = fit_viewport(&set, &FitConfig::default());
        assert!(vp.width() > 0.0);
        assert!(vp.contains(Vec2::new(1.0, 2.0), 0.0));
    }
}
