use crate::clip::{ClipError, InfiniteLine, Segment};
use crate::geom::{BBox2, Vec2};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Receiving end of the rendering surface: displays the latest segment.
pub trait SegmentSink {
    fn set_segment(&mut self, segment: Segment);
}

/// Supplies the currently visible rectangle on demand.
pub trait BoundsSource {
    fn bounds(&self) -> BBox2;
}

/// Records every published segment, oldest first.
impl SegmentSink for Vec<Segment> {
    fn set_segment(&mut self, segment: Segment) {
        self.push(segment);
    }
}

/// Keeps only the most recent segment.
impl SegmentSink for Option<Segment> {
    fn set_segment(&mut self, segment: Segment) {
        *self = Some(segment);
    }
}

impl<S: SegmentSink + ?Sized> SegmentSink for &mut S {
    fn set_segment(&mut self, segment: Segment) {
        (**self).set_segment(segment);
    }
}

impl<S: SegmentSink + ?Sized> SegmentSink for Rc<RefCell<S>> {
    fn set_segment(&mut self, segment: Segment) {
        self.borrow_mut().set_segment(segment);
    }
}

impl<S: SegmentSink + ?Sized> SegmentSink for Arc<Mutex<S>> {
    fn set_segment(&mut self, segment: Segment) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set_segment(segment);
    }
}

/// Re-clips a fixed line whenever the viewport changes and pushes the result
/// to the sink before returning.
#[derive(Debug)]
pub struct ViewportObserver<S> {
    line: InfiniteLine,
    sink: S,
}

impl<S: SegmentSink> ViewportObserver<S> {
    pub fn new(p0: Vec2, p1: Vec2, sink: S) -> Result<Self, ClipError> {
        Ok(Self::with_line(InfiniteLine::new(p0, p1)?, sink))
    }

    pub fn with_line(line: InfiniteLine, sink: S) -> Self {
        Self { line, sink }
    }

    pub fn on_viewport_changed(&mut self, rect: &BBox2) -> Segment {
        let segment = self.line.clip(rect);
        debug!(
            x_min = rect.x_min(),
            x_max = rect.x_max(),
            y_min = rect.y_min(),
            y_max = rect.y_max(),
            ?segment,
            "viewport changed; republishing clipped line"
        );
        self.sink.set_segment(segment);
        segment
    }

    /// Pulls the current bounds from `source` and republishes.
    pub fn sync(&mut self, source: &impl BoundsSource) -> Segment {
        self.on_viewport_changed(&source.bounds())
    }

    pub fn line(&self) -> &InfiniteLine {
        &self.line
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Observer that may be notified from several threads.
///
/// The lock spans both the clip and the publish, so the sink sees segments in
/// the order the notifications acquired it.
#[derive(Debug)]
pub struct SharedObserver<S> {
    inner: Arc<Mutex<ViewportObserver<S>>>,
}

impl<S> Clone for SharedObserver<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: SegmentSink> SharedObserver<S> {
    pub fn new(observer: ViewportObserver<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(observer)),
        }
    }

    pub fn notify(&self, rect: &BBox2) -> Segment {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on_viewport_changed(rect)
    }

    /// Runs `f` against the sink while holding the observer lock.
    pub fn with_sink<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(guard.sink())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(BBox2);

    impl BoundsSource for Fixed {
        fn bounds(&self) -> BBox2 {
            self.0
        }
    }

    #[test]
    fn publishes_synchronously() {
        let mut observer =
            ViewportObserver::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), None).unwrap();
        assert_eq!(None, *observer.sink());
        let seg = observer.on_viewport_changed(&BBox2::from_limits(-1.0, 1.0, -1.0, 1.0));
        assert_eq!(Some(seg), *observer.sink());
    }

    #[test]
    fn sync_reads_bounds_from_source() {
        let mut observer =
            ViewportObserver::new(Vec2::new(0.0, 2.0), Vec2::new(1.0, 2.0), Vec::new()).unwrap();
        observer.sync(&Fixed(BBox2::from_limits(-4.0, 4.0, 0.0, 3.0)));
        let published = observer.into_sink();
        assert_eq!(1, published.len());
        assert_eq!(Vec2::new(-4.0, 2.0), published[0].a);
        assert_eq!(Vec2::new(4.0, 2.0), published[0].b);
    }

    #[test]
    fn shared_sink_sees_updates() {
        let sink: Rc<RefCell<Vec<Segment>>> = Rc::default();
        let mut observer =
            ViewportObserver::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Rc::clone(&sink))
                .unwrap();
        observer.on_viewport_changed(&BBox2::from_limits(-5.0, 5.0, -5.0, 5.0));
        observer.on_viewport_changed(&BBox2::from_limits(-5.0, 5.0, -1.0, 1.0));
        assert_eq!(2, sink.borrow().len());
        assert_eq!(1.0, sink.borrow()[1].b.y);
    }
}
