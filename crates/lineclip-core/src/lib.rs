//! Clipping an infinite line to a rectangular viewport, and keeping the
//! clipped segment current as the viewport is panned and zoomed.

pub mod analysis;
pub mod clip;
pub mod fit;
pub mod geom;
pub mod homogeneous;
pub mod model;
pub mod observer;
pub mod report;
pub mod viewport;

pub use clip::{clip, ClipAxis, ClipError, InfiniteLine, Segment};
pub use geom::{BBox2, Vec2};
pub use observer::{BoundsSource, SegmentSink, SharedObserver, ViewportObserver};
pub use viewport::{Axis, BoundsChange, Viewport};
