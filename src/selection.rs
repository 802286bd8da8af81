//! Selection tracker: the page text selection shared by chat and translation.
//!
//! The page forwards every pointer-release event to [`SelectionTracker::on_pointer_release`]
//! with whatever text the browser reports as selected. The tracker keeps the
//! trimmed value until a consumer takes it with [`SelectionTracker::consume`],
//! so one selection is folded into at most one request.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::debug;

/// Maximum number of characters shown in a selection preview.
pub const PREVIEW_MAX_CHARS: usize = 100;

struct TrackerInner {
    tx: watch::Sender<Option<String>>,
    mounted: AtomicBool,
}

/// Shared handle to the current page selection.
///
/// Clones observe and mutate the same value.
#[derive(Clone)]
pub struct SelectionTracker {
    inner: Arc<TrackerInner>,
}

impl SelectionTracker {
    /// Create a tracker that is not yet listening to the page.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(TrackerInner {
                tx,
                mounted: AtomicBool::new(false),
            }),
        }
    }

    /// Create a tracker that is already listening.
    pub fn mounted() -> Self {
        let tracker = Self::new();
        tracker.mount();
        tracker
    }

    /// Attach the page-level listener.
    pub fn mount(&self) {
        if !self.inner.mounted.swap(true, Ordering::SeqCst) {
            debug!("Selection listener attached");
        }
    }

    /// Detach the page-level listener and drop any tracked selection.
    pub fn unmount(&self) {
        if self.inner.mounted.swap(false, Ordering::SeqCst) {
            debug!("Selection listener detached");
        }
        self.clear();
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.load(Ordering::SeqCst)
    }

    /// Handle a pointer-release event carrying the browser's current selection.
    ///
    /// Ignored while unmounted. Whitespace-only selections reset the value.
    pub fn on_pointer_release(&self, raw: Option<&str>) {
        if !self.is_mounted() {
            return;
        }
        let next = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self.inner.tx.send_replace(next);
    }

    /// The current selection, if any.
    pub fn current(&self) -> Option<String> {
        self.inner.tx.borrow().clone()
    }

    pub fn is_present(&self) -> bool {
        self.inner.tx.borrow().is_some()
    }

    /// Take the current selection, leaving none behind.
    pub fn consume(&self) -> Option<String> {
        let taken = self.inner.tx.send_replace(None);
        if taken.is_some() {
            debug!("Selection consumed");
        }
        taken
    }

    /// Drop the current selection without using it.
    pub fn clear(&self) {
        self.inner.tx.send_if_modified(|current| current.take().is_some());
    }

    /// Short form of the selection for display.
    pub fn preview(&self) -> Option<String> {
        self.inner.tx.borrow().as_deref().map(preview_text)
    }

    /// Receive a notification whenever the selection changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.inner.tx.subscribe()
    }
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SelectionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionTracker")
            .field("mounted", &self.is_mounted())
            .field("selection", &*self.inner.tx.borrow())
            .finish()
    }
}

/// Truncate text to [`PREVIEW_MAX_CHARS`] characters, marking the cut with `...`.
pub fn preview_text(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_stores_trimmed_selection() {
        let tracker = SelectionTracker::mounted();
        tracker.on_pointer_release(Some("  inverse kinematics \n"));
        assert_eq!(tracker.current().as_deref(), Some("inverse kinematics"));
    }

    #[test]
    fn empty_release_resets_selection() {
        let tracker = SelectionTracker::mounted();
        tracker.on_pointer_release(Some("torque"));
        tracker.on_pointer_release(Some("   "));
        assert!(tracker.current().is_none());

        tracker.on_pointer_release(Some("torque"));
        tracker.on_pointer_release(None);
        assert!(!tracker.is_present());
    }

    #[test]
    fn last_event_wins() {
        let tracker = SelectionTracker::mounted();
        tracker.on_pointer_release(Some("first"));
        tracker.on_pointer_release(Some("second"));
        assert_eq!(tracker.current().as_deref(), Some("second"));
    }

    #[test]
    fn consume_returns_value_once() {
        let tracker = SelectionTracker::mounted();
        tracker.on_pointer_release(Some("actuator"));
        assert_eq!(tracker.consume().as_deref(), Some("actuator"));
        assert_eq!(tracker.consume(), None);
        assert!(tracker.current().is_none());
    }

    #[test]
    fn unmounted_tracker_ignores_events() {
        let tracker = SelectionTracker::new();
        tracker.on_pointer_release(Some("ignored"));
        assert!(tracker.current().is_none());

        tracker.mount();
        tracker.on_pointer_release(Some("kept"));
        tracker.unmount();
        assert!(tracker.current().is_none(), "unmount clears the selection");
        tracker.on_pointer_release(Some("after unmount"));
        assert!(tracker.current().is_none());
    }

    #[test]
    fn clones_share_state() {
        let tracker = SelectionTracker::mounted();
        let other = tracker.clone();
        tracker.on_pointer_release(Some("shared"));
        assert_eq!(other.consume().as_deref(), Some("shared"));
        assert!(tracker.current().is_none());
    }

    #[test]
    fn subscribers_see_changes() {
        let tracker = SelectionTracker::mounted();
        let mut rx = tracker.subscribe();
        tracker.on_pointer_release(Some("gait"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_deref(), Some("gait"));

        tracker.consume();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
    }

    #[test]
    fn preview_truncates_long_selection() {
        let long = "a".repeat(150);
        let preview = preview_text(&long);
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS + 3);
        assert!(preview.ends_with("..."));

        let exact = "b".repeat(PREVIEW_MAX_CHARS);
        assert_eq!(preview_text(&exact), exact);
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let text = "é".repeat(101);
        let preview = preview_text(&text);
        assert!(preview.starts_with(&"é".repeat(100)));
        assert!(preview.ends_with("..."));
    }
}
