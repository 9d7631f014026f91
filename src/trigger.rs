//! Scroll-position signal that asks for the next page.
//!
//! A sentinel block is rendered after the last feed row; the fraction of it
//! that is inside the viewport is its intersection ratio.  The trigger is a
//! plain value evaluated against the current `loading`/`has_more` flags on
//! every tick, so there is no captured state that could go stale when those
//! flags flip.

pub const DEFAULT_THRESHOLD: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadMoreTrigger {
    threshold: f32,
}

impl Default for LoadMoreTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl LoadMoreTrigger {
    /// `threshold` is clamped to `0.0..=1.0`.
    pub fn new(threshold: f32) -> Self {
        let threshold = if threshold.is_finite() {
            threshold.clamp(0.0, 1.0)
        } else {
            DEFAULT_THRESHOLD
        };
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether a load-more request should be issued now.
    ///
    /// Repeated firings while a fetch is in flight are absorbed by `loading`.
    pub fn should_fire(&self, ratio: f32, loading: bool, has_more: bool) -> bool {
        ratio > 0.0 && ratio >= self.threshold && !loading && has_more
    }
}

/// Fraction of a `sentinel_len`-row block starting at row `sentinel_start`
/// that is visible in a viewport of `viewport_len` rows starting at
/// `viewport_start`.
pub fn intersection_ratio(
    viewport_start: usize,
    viewport_len: usize,
    sentinel_start: usize,
    sentinel_len: usize,
) -> f32 {
    if sentinel_len == 0 || viewport_len == 0 {
        return 0.0;
    }
    let top = viewport_start.max(sentinel_start);
    let bottom = (viewport_start + viewport_len).min(sentinel_start + sentinel_len);
    if bottom <= top {
        return 0.0;
    }
    (bottom - top) as f32 / sentinel_len as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_when_visible_idle_and_more_available() {
        let trigger = LoadMoreTrigger::default();
        assert!(trigger.should_fire(1.0, false, true));
        assert!(trigger.should_fire(0.8, false, true));
    }

    #[test]
    fn gated_by_ratio_loading_and_has_more() {
        let trigger = LoadMoreTrigger::default();
        assert!(!trigger.should_fire(0.5, false, true));
        assert!(!trigger.should_fire(1.0, true, true));
        assert!(!trigger.should_fire(1.0, false, false));
    }

    #[test]
    fn zero_threshold_still_needs_some_visibility() {
        let trigger = LoadMoreTrigger::new(0.0);
        assert!(!trigger.should_fire(0.0, false, true));
        assert!(trigger.should_fire(0.25, false, true));
    }

    #[test]
    fn threshold_is_clamped() {
        assert_eq!(LoadMoreTrigger::new(3.0).threshold(), 1.0);
        assert_eq!(LoadMoreTrigger::new(-1.0).threshold(), 0.0);
        assert_eq!(LoadMoreTrigger::new(f32::NAN).threshold(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn ratio_of_partially_visible_sentinel() {
        // 10 items, sentinel rows 10..14, viewport rows 5..13 shows 3 of 4.
        assert_eq!(intersection_ratio(5, 8, 10, 4), 0.75);
        // Fully visible.
        assert_eq!(intersection_ratio(8, 10, 10, 4), 1.0);
        // Entirely below the viewport.
        assert_eq!(intersection_ratio(0, 8, 10, 4), 0.0);
        assert_eq!(intersection_ratio(0, 0, 0, 4), 0.0);
    }
}
