//! Classifies raw pointer/touch streams into reader intents.
//!
//! The recognizer is deliberately input-agnostic: callers feed it stage-local
//! coordinates and a millisecond clock, and it answers with committed intents.
//! Nothing in here touches the window or the view state.

pub(super) const DOUBLE_TAP_WINDOW_MS: u64 = 320;
pub(super) const DOUBLE_TAP_SLOP_PX: f32 = 36.0;
pub(super) const PINCH_TAP_SUPPRESS_MS: u64 = 350;
pub(super) const EDGE_ZONE_PX: f32 = 24.0;
pub(super) const SWIPE_COMMIT_PX: f32 = 72.0;
pub(super) const SWIPE_HORIZONTAL_DOMINANCE: f32 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SwipeKind {
    OpenSidebar,
    CloseSidebar,
}

/// Which swipe, if any, a touch starting at `x` arms. Only presses within
/// the left edge zone can open the panel; with the panel open, the panel and
/// its backdrop (the whole viewport) arm a close.
pub(super) fn swipe_arm_kind(sidebar_open: bool, x: f32) -> Option<SwipeKind> {
    if !sidebar_open && x <= EDGE_ZONE_PX {
        Some(SwipeKind::OpenSidebar)
    } else if sidebar_open {
        Some(SwipeKind::CloseSidebar)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy)]
struct TapSample {
    x: f32,
    y: f32,
    at_ms: u64,
}

#[derive(Debug, Clone, Copy)]
struct PinchSession {
    start_span: f32,
    start_scale: f32,
    focus_x: f32,
}

#[derive(Debug, Clone, Copy)]
struct SwipeSession {
    kind: SwipeKind,
    start_x: f32,
    start_y: f32,
    last_x: f32,
    last_y: f32,
}

#[derive(Default)]
pub(super) struct GestureRecognizer {
    last_tap: Option<TapSample>,
    pinch: Option<PinchSession>,
    last_pinch_end_ms: u64,
    swipe: Option<SwipeSession>,
}

impl GestureRecognizer {
    pub(super) fn begin_pinch(&mut self, span: f32, scale: f32, focus_x: f32) {
        if span <= 0.0 {
            return;
        }
        self.pinch = Some(PinchSession {
            start_span: span,
            start_scale: scale,
            focus_x,
        });
    }

    pub(super) fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    pub(super) fn pinch_focus_x(&self) -> Option<f32> {
        self.pinch.map(|session| session.focus_x)
    }

    /// Raw scale for the current span: `start_scale * span / start_span`.
    /// Clamping to the zoom bounds is the zoom engine's business.
    pub(super) fn pinch_scale(&self, span: f32) -> Option<f32> {
        if span <= 0.0 {
            return None;
        }
        self.pinch
            .map(|session| session.start_scale * (span / session.start_span))
    }

    pub(super) fn end_pinch(&mut self, now_ms: u64) -> bool {
        if self.pinch.take().is_some() {
            self.last_pinch_end_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Feed one tap; returns true when it completes a double tap. Taps landing
    /// shortly after a pinch ended are dropped entirely, so fingers lifting
    /// asynchronously cannot toggle the chrome.
    pub(super) fn tap(&mut self, x: f32, y: f32, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_pinch_end_ms) < PINCH_TAP_SUPPRESS_MS
            && self.last_pinch_end_ms > 0
        {
            return false;
        }

        if let Some(previous) = self.last_tap {
            let elapsed = now_ms.saturating_sub(previous.at_ms);
            let moved = ((x - previous.x).powi(2) + (y - previous.y).powi(2)).sqrt();
            if elapsed < DOUBLE_TAP_WINDOW_MS && moved < DOUBLE_TAP_SLOP_PX {
                self.last_tap = None;
                return true;
            }
        }

        self.last_tap = Some(TapSample { x, y, at_ms: now_ms });
        false
    }

    pub(super) fn begin_swipe(&mut self, kind: SwipeKind, x: f32, y: f32) {
        self.swipe = Some(SwipeSession {
            kind,
            start_x: x,
            start_y: y,
            last_x: x,
            last_y: y,
        });
    }

    pub(super) fn swipe_in_progress(&self) -> bool {
        self.swipe.is_some()
    }

    pub(super) fn update_swipe(&mut self, x: f32, y: f32) {
        if let Some(session) = self.swipe.as_mut() {
            session.last_x = x;
            session.last_y = y;
        }
    }

    /// Commits the tracked swipe if it was predominantly horizontal and moved
    /// far enough in the expected direction; anything else is a no-op.
    pub(super) fn end_swipe(&mut self) -> Option<SwipeKind> {
        let session = self.swipe.take()?;
        let delta_x = session.last_x - session.start_x;
        let delta_y = session.last_y - session.start_y;
        if delta_x.abs() <= delta_y.abs() * SWIPE_HORIZONTAL_DOMINANCE {
            return None;
        }
        match session.kind {
            SwipeKind::OpenSidebar if delta_x > SWIPE_COMMIT_PX => Some(session.kind),
            SwipeKind::CloseSidebar if delta_x < -SWIPE_COMMIT_PX => Some(session.kind),
            _ => None,
        }
    }

    pub(super) fn cancel_swipe(&mut self) {
        self.swipe = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinch_scale_follows_the_span_ratio() {
        let mut gestures = GestureRecognizer::default();
        gestures.begin_pinch(100.0, 1.0, 320.0);
        assert_eq!(gestures.pinch_scale(200.0), Some(2.0));
        assert_eq!(gestures.pinch_scale(50.0), Some(0.5));
        assert_eq!(gestures.pinch_focus_x(), Some(320.0));
    }

    #[test]
    fn pinch_scale_starts_from_the_session_scale() {
        let mut gestures = GestureRecognizer::default();
        gestures.begin_pinch(120.0, 1.5, 0.0);
        assert_eq!(gestures.pinch_scale(240.0), Some(3.0));
    }

    #[test]
    fn degenerate_spans_never_produce_a_scale() {
        let mut gestures = GestureRecognizer::default();
        gestures.begin_pinch(0.0, 1.0, 0.0);
        assert!(!gestures.is_pinching());
        gestures.begin_pinch(100.0, 1.0, 0.0);
        assert_eq!(gestures.pinch_scale(0.0), None);
    }

    #[test]
    fn two_close_taps_make_a_double_tap() {
        let mut gestures = GestureRecognizer::default();
        assert!(!gestures.tap(10.0, 10.0, 1_000));
        assert!(gestures.tap(12.0, 11.0, 1_300));
    }

    #[test]
    fn a_late_third_tap_starts_a_new_sequence() {
        let mut gestures = GestureRecognizer::default();
        assert!(!gestures.tap(10.0, 10.0, 1_000));
        assert!(gestures.tap(12.0, 11.0, 1_300));
        // More than the window after the double: arms, does not toggle.
        assert!(!gestures.tap(12.0, 11.0, 1_700));
    }

    #[test]
    fn far_apart_taps_do_not_double() {
        let mut gestures = GestureRecognizer::default();
        assert!(!gestures.tap(10.0, 10.0, 1_000));
        assert!(!gestures.tap(80.0, 10.0, 1_100));
    }

    #[test]
    fn taps_right_after_a_pinch_are_suppressed() {
        let mut gestures = GestureRecognizer::default();
        gestures.begin_pinch(100.0, 1.0, 0.0);
        assert!(gestures.end_pinch(5_000));
        assert!(!gestures.tap(10.0, 10.0, 5_100));
        assert!(!gestures.tap(10.0, 10.0, 5_200));
        // Past the suppression window taps classify normally again.
        assert!(!gestures.tap(10.0, 10.0, 5_400));
        assert!(gestures.tap(10.0, 10.0, 5_500));
    }

    #[test]
    fn only_edge_presses_arm_an_open_swipe() {
        assert_eq!(swipe_arm_kind(false, 10.0), Some(SwipeKind::OpenSidebar));
        assert_eq!(swipe_arm_kind(false, EDGE_ZONE_PX), Some(SwipeKind::OpenSidebar));
        // Away from the edge with the panel closed: nothing to track, so an
        // otherwise-valid swipe cannot open the panel a second time.
        assert_eq!(swipe_arm_kind(false, 200.0), None);
        assert_eq!(swipe_arm_kind(true, 200.0), Some(SwipeKind::CloseSidebar));
    }

    #[test]
    fn edge_swipe_commits_when_horizontal_and_long_enough() {
        let mut gestures = GestureRecognizer::default();
        gestures.begin_swipe(SwipeKind::OpenSidebar, 10.0, 200.0);
        gestures.update_swipe(100.0, 210.0);
        assert_eq!(gestures.end_swipe(), Some(SwipeKind::OpenSidebar));
    }

    #[test]
    fn mostly_vertical_movement_does_not_commit() {
        let mut gestures = GestureRecognizer::default();
        gestures.begin_swipe(SwipeKind::OpenSidebar, 10.0, 100.0);
        gestures.update_swipe(90.0, 260.0);
        assert_eq!(gestures.end_swipe(), None);
    }

    #[test]
    fn close_swipe_requires_leftward_movement() {
        let mut gestures = GestureRecognizer::default();
        gestures.begin_swipe(SwipeKind::CloseSidebar, 200.0, 100.0);
        gestures.update_swipe(110.0, 104.0);
        assert_eq!(gestures.end_swipe(), Some(SwipeKind::CloseSidebar));

        gestures.begin_swipe(SwipeKind::CloseSidebar, 200.0, 100.0);
        gestures.update_swipe(290.0, 104.0);
        assert_eq!(gestures.end_swipe(), None);
    }

    #[test]
    fn cancel_aborts_tracking_without_side_effects() {
        let mut gestures = GestureRecognizer::default();
        gestures.begin_swipe(SwipeKind::OpenSidebar, 10.0, 100.0);
        gestures.update_swipe(120.0, 104.0);
        gestures.cancel_swipe();
        assert_eq!(gestures.end_swipe(), None);
        assert!(!gestures.swipe_in_progress());
    }
}
