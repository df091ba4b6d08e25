//! Auto-advancing carousel state (rendering-agnostic)
//!
//! The index moves forward once per interval and wraps after the last slide.
//! The interval itself is driven from outside (see `core::timers`), this struct
//! only tracks where the carousel is and how far the slide animation has got.

use crate::widgets::reveal::Easing;
use std::time::{Duration, Instant};

/// Default time each slide stays on screen
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(4000);

/// Default length of the slide-over animation
pub const DEFAULT_SLIDE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct CarouselState {
    len: usize,
    index: usize,
    interval: Duration,
    /// Slide animation: index we are leaving and when we started
    previous: usize,
    changed_at: Option<Instant>,
    slide_duration: Duration,
}

impl CarouselState {
    pub fn new(len: usize, interval: Duration) -> Self {
        Self {
            len,
            index: 0,
            interval,
            previous: 0,
            changed_at: None,
            slide_duration: DEFAULT_SLIDE,
        }
    }

    pub fn with_slide_duration(mut self, slide: Duration) -> Self {
        self.slide_duration = slide;
        self
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Move to the next slide, wrapping to 0 after the last one.
    pub fn advance(&mut self) {
        if self.len == 0 {
            return;
        }
        self.index = if self.index == self.len - 1 { 0 } else { self.index + 1 };
    }

    /// Advance and start the slide animation at `now`.
    pub fn tick(&mut self, now: Instant) {
        let from = self.index;
        self.advance();
        if from != self.index {
            self.previous = from;
            self.changed_at = Some(now);
        }
    }

    /// Whether the dot at `i` is the highlighted one
    pub fn is_current(&self, i: usize) -> bool {
        i == self.index
    }

    /// Counter text shown in the corner, e.g. "2 / 5"
    pub fn counter_label(&self) -> String {
        if self.len == 0 {
            return "0 / 0".to_string();
        }
        format!("{} / {}", self.index + 1, self.len)
    }

    /// Fractional slide position at `now`, easing from the previous index to
    /// the current one. A wrap from the last slide slides all the way back.
    pub fn position(&self, now: Instant) -> f32 {
        let target = self.index as f32;
        let Some(changed_at) = self.changed_at else {
            return target;
        };
        if self.slide_duration.is_zero() {
            return target;
        }
        let t = now.saturating_duration_since(changed_at).as_secs_f32()
            / self.slide_duration.as_secs_f32();
        if t >= 1.0 {
            return target;
        }
        let from = self.previous as f32;
        from + (target - from) * Easing::EaseInOut.apply(t)
    }

    pub fn is_sliding(&self, now: Instant) -> bool {
        self.changed_at
            .map(|t| now.saturating_duration_since(t) < self.slide_duration)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Duration = Duration::from_millis(4000);

    #[test]
    fn test_index_after_k_ticks() {
        let start = Instant::now();
        for n in 1..=6usize {
            let mut c = CarouselState::new(n, T);
            for k in 1..20u32 {
                c.tick(start + T * k);
                assert_eq!(c.index(), k as usize % n, "n={} k={}", n, k);
            }
        }
    }

    #[test]
    fn test_single_item_never_moves() {
        let mut c = CarouselState::new(1, T);
        for _ in 0..10 {
            c.advance();
            assert_eq!(c.index(), 0);
        }
        assert_eq!(c.counter_label(), "1 / 1");
    }

    #[test]
    fn test_empty_carousel_is_inert() {
        let start = Instant::now();
        let mut c = CarouselState::new(0, T);
        c.advance();
        c.tick(start);
        assert_eq!(c.index(), 0);
        assert!(!c.is_sliding(start));
        assert_eq!(c.counter_label(), "0 / 0");
    }

    #[test]
    fn test_indicators() {
        let mut c = CarouselState::new(5, T);
        c.advance();
        c.advance();
        assert!(c.is_current(2));
        assert!(!c.is_current(0));
        assert_eq!(c.counter_label(), "3 / 5");
    }

    #[test]
    fn test_slide_position_eases_between_indices() {
        let start = Instant::now();
        let mut c = CarouselState::new(3, T);
        assert_eq!(c.position(start), 0.0);

        c.tick(start);
        let mid = c.position(start + Duration::from_millis(500));
        assert!(mid > 0.0 && mid < 1.0);
        assert!(c.is_sliding(start + Duration::from_millis(500)));
        assert_eq!(c.position(start + DEFAULT_SLIDE), 1.0);

        // Wrap slides back across the row
        c.tick(start);
        c.tick(start + DEFAULT_SLIDE);
        assert_eq!(c.index(), 0);
        let back = c.position(start + DEFAULT_SLIDE + Duration::from_millis(500));
        assert!(back > 0.0 && back < 2.0);
    }
}
