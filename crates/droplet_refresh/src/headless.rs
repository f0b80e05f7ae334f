//! In-memory scroll host
//!
//! Behaves like a platform scroll view as far as the refresh control can
//! tell: offset and inset writes notify observers synchronously, gestures
//! toggle the tracking and dragging flags, and sectioned content reports its
//! header heights.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use droplet_core::{
    EdgeInsets, HostEvent, HostEventKind, HostHandler, HostNotifier, Point, Rect, SubscriptionId,
};

use crate::host::ScrollHost;

pub struct HeadlessScrollView {
    frame: Cell<Rect>,
    offset: Cell<Point>,
    inset: Cell<EdgeInsets>,
    dragging: Cell<bool>,
    tracking: Cell<bool>,
    section_headers: RefCell<Option<Vec<f32>>>,
    inset_writes: RefCell<Vec<EdgeInsets>>,
    notifier: HostNotifier,
}

impl HeadlessScrollView {
    pub fn new(frame: Rect) -> Self {
        Self {
            frame: Cell::new(frame),
            offset: Cell::new(Point::ZERO),
            inset: Cell::new(EdgeInsets::ZERO),
            dragging: Cell::new(false),
            tracking: Cell::new(false),
            section_headers: RefCell::new(None),
            inset_writes: RefCell::new(Vec::new()),
            notifier: HostNotifier::new(),
        }
    }

    pub fn shared(frame: Rect) -> Rc<Self> {
        Rc::new(Self::new(frame))
    }

    /// Make this a sectioned list with the given header heights
    pub fn set_section_headers(&self, heights: Option<Vec<f32>>) {
        *self.section_headers.borrow_mut() = heights;
    }

    pub fn set_frame(&self, frame: Rect) {
        self.frame.set(frame);
    }

    /// Every inset written so far, oldest first
    pub fn inset_history(&self) -> Vec<EdgeInsets> {
        self.inset_writes.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.notifier.len()
    }

    /// Finger down and moving: content follows to `y`
    pub fn drag_to(&self, y: f32) {
        self.tracking.set(true);
        self.dragging.set(true);
        self.set_content_offset(Point::new(self.offset.get().x, y));
    }

    /// Finger lifted
    pub fn release(&self) {
        self.dragging.set(false);
        self.tracking.set(false);
    }

    /// Move the content without a finger on it (deceleration, bounce)
    pub fn scroll_to(&self, y: f32) {
        self.set_content_offset(Point::new(self.offset.get().x, y));
    }

    /// Lift the finger and bounce back to the resting position for the
    /// current inset
    pub fn settle(&self) {
        self.release();
        self.scroll_to(-self.inset.get().top);
    }
}

impl ScrollHost for HeadlessScrollView {
    fn frame(&self) -> Rect {
        self.frame.get()
    }

    fn content_offset(&self) -> Point {
        self.offset.get()
    }

    fn set_content_offset(&self, offset: Point) {
        self.offset.set(offset);
        self.notifier.notify(&HostEvent::ContentOffsetChanged(offset));
    }

    fn content_inset(&self) -> EdgeInsets {
        self.inset.get()
    }

    fn set_content_inset(&self, inset: EdgeInsets) {
        self.inset.set(inset);
        self.inset_writes.borrow_mut().push(inset);
        self.notifier.notify(&HostEvent::ContentInsetChanged(inset));
    }

    fn is_dragging(&self) -> bool {
        self.dragging.get()
    }

    fn is_tracking(&self) -> bool {
        self.tracking.get()
    }

    fn section_header_heights(&self) -> Option<Vec<f32>> {
        self.section_headers.borrow().clone()
    }

    fn subscribe(&self, kind: HostEventKind, handler: HostHandler) -> SubscriptionId {
        self.notifier.subscribe(kind, handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_notify_synchronously() {
        let view = HeadlessScrollView::new(Rect::new(0.0, 0.0, 320.0, 480.0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        view.subscribe(
            HostEventKind::ContentOffset,
            Rc::new(move |event: &HostEvent| seen_clone.borrow_mut().push(*event)),
        );

        view.drag_to(-30.0);
        assert!(view.is_dragging() && view.is_tracking());
        assert_eq!(
            seen.borrow().as_slice(),
            &[HostEvent::ContentOffsetChanged(Point::new(0.0, -30.0))]
        );
    }

    #[test]
    fn test_settle_rests_above_inset() {
        let view = HeadlessScrollView::new(Rect::new(0.0, 0.0, 320.0, 480.0));
        view.set_content_inset(EdgeInsets::new(44.0, 0.0, 0.0, 0.0));
        view.drag_to(-80.0);
        view.settle();

        assert!(!view.is_dragging());
        assert_eq!(view.content_offset(), Point::new(0.0, -44.0));
        assert_eq!(view.inset_history().len(), 1);
    }
}
