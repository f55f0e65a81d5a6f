//! Pan/zoom state of a plotting surface with change subscriptions.
//!
//! Horizontal and vertical limit changes are reported as separate events, and
//! each event carries the full rectangle as it stands after that axis moved.

use crate::geom::{BBox2, Vec2};
use crate::observer::BoundsSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsChange {
    pub axis: Axis,
    pub bounds: BBox2,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ViewportError {
    #[error("zoom factor must be finite and positive, got {0}")]
    InvalidZoom(f64),
    #[error("axis limits must be finite, got [{0}, {1}]")]
    NonFiniteLimits(f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&BoundsChange)>;

pub struct Viewport {
    bounds: BBox2,
    handlers: Vec<(SubscriptionId, Handler)>,
    next_id: u64,
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("bounds", &self.bounds)
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

impl Viewport {
    pub fn new(bounds: BBox2) -> Self {
        Self {
            bounds,
            handlers: Vec::new(),
            next_id: 1,
        }
    }

    pub fn bounds(&self) -> BBox2 {
        self.bounds
    }

    /// Registers `handler`; it runs synchronously on every later limit change.
    pub fn on_bounds_changed(
        &mut self,
        handler: impl FnMut(&BoundsChange) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        self.handlers.len() != before
    }

    pub fn set_x_limits(&mut self, min: f64, max: f64) -> Result<(), ViewportError> {
        check_finite(min, max)?;
        let (min, max) = (min.min(max), min.max(max));
        if self.bounds.min.x == min && self.bounds.max.x == max {
            return Ok(());
        }
        self.bounds.min.x = min;
        self.bounds.max.x = max;
        self.emit(Axis::X);
        Ok(())
    }

    pub fn set_y_limits(&mut self, min: f64, max: f64) -> Result<(), ViewportError> {
        check_finite(min, max)?;
        let (min, max) = (min.min(max), min.max(max));
        if self.bounds.min.y == min && self.bounds.max.y == max {
            return Ok(());
        }
        self.bounds.min.y = min;
        self.bounds.max.y = max;
        self.emit(Axis::Y);
        Ok(())
    }

    /// Replaces both axes; x is applied (and reported) before y.
    pub fn set_bounds(&mut self, bounds: BBox2) -> Result<(), ViewportError> {
        check_finite(bounds.min.x, bounds.max.x)?;
        check_finite(bounds.min.y, bounds.max.y)?;
        self.set_x_limits(bounds.min.x, bounds.max.x)?;
        self.set_y_limits(bounds.min.y, bounds.max.y)
    }

    /// Shifts the visible window by `(dx, dy)` world units.
    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<(), ViewportError> {
        let b = self.bounds;
        self.set_bounds(BBox2::new(
            Vec2::new(b.min.x + dx, b.min.y + dy),
            Vec2::new(b.max.x + dx, b.max.y + dy),
        ))
    }

    /// Scales the visible window about `anchor`. `factor > 1` zooms in.
    pub fn zoom(&mut self, factor: f64, anchor: Vec2) -> Result<(), ViewportError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ViewportError::InvalidZoom(factor));
        }
        let b = self.bounds;
        let scale = |v: f64, a: f64| a + (v - a) / factor;
        self.set_bounds(BBox2::new(
            Vec2::new(scale(b.min.x, anchor.x), scale(b.min.y, anchor.y)),
            Vec2::new(scale(b.max.x, anchor.x), scale(b.max.y, anchor.y)),
        ))
    }

    fn emit(&mut self, axis: Axis) {
        let change = BoundsChange {
            axis,
            bounds: self.bounds,
        };
        for (_, handler) in &mut self.handlers {
            handler(&change);
        }
    }
}

impl BoundsSource for Viewport {
    fn bounds(&self) -> BBox2 {
        self.bounds
    }
}

fn check_finite(min: f64, max: f64) -> Result<(), ViewportError> {
    if min.is_finite() && max.is_finite() {
        Ok(())
    } else {
        Err(ViewportError::NonFiniteLimits(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(vp: &mut Viewport) -> Rc<RefCell<Vec<BoundsChange>>> {
        let log: Rc<RefCell<Vec<BoundsChange>>> = Rc::default();
        let sink = Rc::clone(&log);
        vp.on_bounds_changed(move |c| sink.borrow_mut().push(*c));
        log
    }

    #[test]
    fn pan_reports_each_axis_with_full_rect() {
        let mut vp = Viewport::new(BBox2::from_limits(0.0, 10.0, 0.0, 10.0));
        let log = recorder(&mut vp);
        vp.pan(1.0, 2.0).unwrap();

        let log = log.borrow();
        assert_eq!(2, log.len());
        assert_eq!(Axis::X, log[0].axis);
        assert_eq!(BBox2::from_limits(1.0, 11.0, 0.0, 10.0), log[0].bounds);
        assert_eq!(Axis::Y, log[1].axis);
        assert_eq!(BBox2::from_limits(1.0, 11.0, 2.0, 12.0), log[1].bounds);
    }

    #[test]
    fn unchanged_limits_are_silent() {
        let mut vp = Viewport::new(BBox2::from_limits(0.0, 10.0, 0.0, 10.0));
        let log = recorder(&mut vp);
        vp.set_x_limits(0.0, 10.0).unwrap();
        vp.pan(3.0, 0.0).unwrap();
        assert_eq!(1, log.borrow().len());
        assert_eq!(Axis::X, log.borrow()[0].axis);
    }

    #[test]
    fn zoom_about_anchor() {
        let mut vp = Viewport::new(BBox2::from_limits(-10.0, 10.0, -4.0, 4.0));
        vp.zoom(2.0, Vec2::new(0.0, 0.0)).unwrap();
        assert_eq!(BBox2::from_limits(-5.0, 5.0, -2.0, 2.0), vp.bounds());
        assert_eq!(
            Err(ViewportError::InvalidZoom(0.0)),
            vp.zoom(0.0, Vec2::new(0.0, 0.0))
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut vp = Viewport::new(BBox2::from_limits(0.0, 1.0, 0.0, 1.0));
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let id = vp.on_bounds_changed(move |_| *c.borrow_mut() += 1);
        vp.set_y_limits(0.0, 2.0).unwrap();
        assert!(vp.unsubscribe(id));
        assert!(!vp.unsubscribe(id));
        vp.set_y_limits(0.0, 3.0).unwrap();
        assert_eq!(1, *count.borrow());
    }

    #[test]
    fn non_finite_limits_rejected() {
        let mut vp = Viewport::new(BBox2::from_limits(0.0, 1.0, 0.0, 1.0));
        assert!(vp.set_x_limits(f64::NAN, 1.0).is_err());
        assert_eq!(BBox2::from_limits(0.0, 1.0, 0.0, 1.0), vp.bounds());
    }
}
