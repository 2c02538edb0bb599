use std::time::{Duration, Instant};

/// How long a press must be held before it counts as a long press.
pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(500);

/// What a completed press interaction resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressAction {
    /// Activate the service in place.
    Activate,
    /// Open the service's endpoint in a new browsing context.
    OpenNewContext,
}

/// Discriminates short clicks from long presses on a service control.
///
/// One tracker per control. The tracker only sees instants, so pointer and
/// touch sources behave identically. Timestamps are passed in rather than
/// sampled, which keeps the state machine deterministic under test.
#[derive(Debug)]
pub struct PressTracker {
    threshold: Duration,
    pressed_at: Option<Instant>,
    long_fired: bool,
}

impl PressTracker {
    pub fn new() -> PressTracker {
        PressTracker::with_threshold(LONG_PRESS_THRESHOLD)
    }

    pub fn with_threshold(threshold: Duration) -> PressTracker {
        PressTracker {
            threshold,
            pressed_at: None,
            long_fired: false,
        }
    }

    /// Pointer went down on the control.
    pub fn press(&mut self, now: Instant) {
        self.pressed_at = Some(now);
        self.long_fired = false;
    }

    /// Timer tick while the pointer is held. Fires the long-press action
    /// exactly once when the threshold elapses; the eventual release of the
    /// same interaction is then swallowed.
    pub fn poll(&mut self, now: Instant) -> Option<PressAction> {
        let pressed_at = self.pressed_at?;
        if !self.long_fired && now.duration_since(pressed_at) >= self.threshold {
            self.long_fired = true;
            return Some(PressAction::OpenNewContext);
        }
        None
    }

    /// Pointer released. `new_context_requested` is true when a modifier
    /// key was held or the service is flagged to always open in a new tab.
    ///
    /// A release past the threshold is a long press even if no poll ran in
    /// between, so the outcome does not depend on timer granularity.
    pub fn release(&mut self, now: Instant, new_context_requested: bool) -> Option<PressAction> {
        let pressed_at = self.pressed_at.take()?;

        if self.long_fired {
            self.long_fired = false;
            return None;
        }

        if now.duration_since(pressed_at) >= self.threshold {
            return Some(PressAction::OpenNewContext);
        }

        if new_context_requested {
            Some(PressAction::OpenNewContext)
        } else {
            Some(PressAction::Activate)
        }
    }

    /// Pointer left the control's bounds: the pending interaction is
    /// abandoned and no action will fire for it.
    #[allow(dead_code, reason = "line input can't leave a control; pointer collaborators can")]
    pub fn cancel(&mut self) {
        self.pressed_at = None;
        self.long_fired = false;
    }
}

impl Default for PressTracker {
    fn default() -> Self {
        PressTracker::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: Duration = LONG_PRESS_THRESHOLD;

    fn after(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    #[test]
    fn short_press_activates() {
        let mut tracker = PressTracker::new();
        let t0 = Instant::now();

        tracker.press(t0);
        assert_eq!(tracker.poll(after(t0, 100)), None);
        assert_eq!(tracker.release(after(t0, 150), false), Some(PressAction::Activate));
    }

    #[test]
    fn modifier_or_newtab_opens_new_context() {
        let mut tracker = PressTracker::new();
        let t0 = Instant::now();

        tracker.press(t0);
        assert_eq!(
            tracker.release(after(t0, 100), true),
            Some(PressAction::OpenNewContext)
        );
    }

    #[test]
    fn long_press_fires_once_and_swallows_release() {
        let mut tracker = PressTracker::new();
        let t0 = Instant::now();

        tracker.press(t0);
        assert_eq!(tracker.poll(t0 + THRESHOLD), Some(PressAction::OpenNewContext));
        // Keep holding: no second fire.
        assert_eq!(tracker.poll(after(t0, 900)), None);
        // The release of the same interaction does nothing.
        assert_eq!(tracker.release(after(t0, 1000), false), None);
    }

    #[test]
    fn release_past_threshold_is_a_long_press_without_poll() {
        let mut tracker = PressTracker::new();
        let t0 = Instant::now();

        tracker.press(t0);
        assert_eq!(
            tracker.release(t0 + THRESHOLD, false),
            Some(PressAction::OpenNewContext)
        );
    }

    #[test]
    fn cancel_discards_the_interaction() {
        let mut tracker = PressTracker::new();
        let t0 = Instant::now();

        tracker.press(t0);
        tracker.cancel();
        assert_eq!(tracker.poll(after(t0, 700)), None);
        assert_eq!(tracker.release(after(t0, 800), false), None);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut tracker = PressTracker::new();
        assert_eq!(tracker.release(Instant::now(), false), None);
    }

    #[test]
    fn tracker_is_reusable_after_a_long_press() {
        let mut tracker = PressTracker::new();
        let t0 = Instant::now();

        tracker.press(t0);
        tracker.poll(t0 + THRESHOLD);
        tracker.release(after(t0, 600), false);

        let t1 = after(t0, 2000);
        tracker.press(t1);
        assert_eq!(tracker.release(after(t1, 50), false), Some(PressAction::Activate));
    }
}
