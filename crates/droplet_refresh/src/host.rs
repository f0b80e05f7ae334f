//! Scroll host abstraction
//!
//! The refresh control never owns the scroll view it decorates. It reads and
//! writes a handful of host properties and observes offset and inset changes
//! through the host's notifier.
//!
//! All methods take `&self`: hosts keep their state behind interior
//! mutability so that observers may write back to the host while a change is
//! being delivered.

use droplet_core::{EdgeInsets, HostEventKind, HostHandler, Point, Rect, SubscriptionId};

/// A scrollable view the refresh control can attach to
pub trait ScrollHost {
    /// Frame of the host in its parent's coordinates
    fn frame(&self) -> Rect;

    fn content_offset(&self) -> Point;

    /// Writing the offset must notify `ContentOffset` subscribers
    /// synchronously, before returning
    fn set_content_offset(&self, offset: Point);

    fn content_inset(&self) -> EdgeInsets;

    /// Writing the inset must notify `ContentInset` subscribers
    /// synchronously, before returning
    fn set_content_inset(&self, inset: EdgeInsets);

    /// A finger is currently moving the content
    fn is_dragging(&self) -> bool;

    /// A finger is down on the content (it may not have moved yet)
    fn is_tracking(&self) -> bool;

    /// Heights of the section headers of the first visible section, for hosts
    /// that pin headers to the top edge. `None` for hosts without sections.
    fn section_header_heights(&self) -> Option<Vec<f32>> {
        None
    }

    /// Observe changes of one kind
    fn subscribe(&self, kind: HostEventKind, handler: HostHandler) -> SubscriptionId;

    /// Stop observing. Returns false if `id` was not subscribed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
