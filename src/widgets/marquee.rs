//! Infinite horizontal strip (marquee) state
//!
//! The strip lays the item list out three times in a row and slides the whole
//! track left by exactly one copy's width per loop. Because the second copy
//! lands where the first one started, restarting the loop is invisible. The
//! third copy covers viewports wider than a single copy.
//!
//! Progress is kept as elapsed time modulo the loop length so a full loop
//! always closes exactly, no matter how the frame times add up.

use std::time::Duration;

/// How many times the list is repeated in the track
pub const TRACK_COPIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarqueeDirection {
    /// Track moves left: offset goes 0 -> -distance
    Forward,
    /// Mirrored: offset goes -distance -> 0
    Reverse,
}

impl MarqueeDirection {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "reverse" | "right" => Self::Reverse,
            _ => Self::Forward,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarqueeState {
    item_count: usize,
    /// Width of one item, cells
    item_width: u16,
    /// Space between items, cells
    gap: u16,
    /// Time for one full loop
    speed: Duration,
    direction: MarqueeDirection,
    /// Time into the current loop
    elapsed: Duration,
    paused: bool,
}

impl MarqueeState {
    pub fn new(
        item_count: usize,
        item_width: u16,
        gap: u16,
        speed: Duration,
        direction: MarqueeDirection,
    ) -> Self {
        Self {
            item_count,
            item_width,
            gap,
            speed,
            direction,
            elapsed: Duration::ZERO,
            paused: false,
        }
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn item_width(&self) -> u16 {
        self.item_width
    }

    /// Horizontal distance between the starts of neighbouring items
    pub fn pitch(&self) -> u32 {
        self.item_width as u32 + self.gap as u32
    }

    /// Distance covered in one loop: one copy of the list
    pub fn distance(&self) -> f64 {
        (self.pitch() as u64 * self.item_count as u64) as f64
    }

    /// Item index for each slot of the track, in order
    pub fn track(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.item_count * TRACK_COPIES).map(move |slot| slot % self.item_count)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pointer entered/left the strip. Hover pauses in place.
    pub fn set_hovered(&mut self, hovered: bool) {
        if self.paused != hovered {
            tracing::trace!("Marquee {}", if hovered { "paused" } else { "resumed" });
        }
        self.paused = hovered;
    }

    /// Advance by one frame's worth of time.
    pub fn advance(&mut self, dt: Duration) {
        if self.paused || self.speed.is_zero() || self.item_count == 0 {
            return;
        }
        let loop_nanos = self.speed.as_nanos();
        let nanos = (self.elapsed.as_nanos() + dt.as_nanos()) % loop_nanos;
        self.elapsed = Duration::from_nanos(nanos as u64);
    }

    /// Fraction of the current loop completed, in [0, 1)
    pub fn progress(&self) -> f64 {
        if self.speed.is_zero() {
            return 0.0;
        }
        self.elapsed.as_secs_f64() / self.speed.as_secs_f64()
    }

    /// Current track offset in cells (always in [-distance, 0])
    pub fn offset(&self) -> f64 {
        let travelled = self.distance() * self.progress();
        match self.direction {
            MarqueeDirection::Forward => -travelled,
            MarqueeDirection::Reverse => -(self.distance() - travelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEED: Duration = Duration::from_secs(30);

    fn strip(n: usize, direction: MarqueeDirection) -> MarqueeState {
        MarqueeState::new(n, 32, 2, SPEED, direction)
    }

    #[test]
    fn test_distance_is_one_copy() {
        let m = strip(8, MarqueeDirection::Forward);
        assert_eq!(m.distance(), (32.0 + 2.0) * 8.0);
        assert_eq!(m.track().count(), 8 * TRACK_COPIES);
    }

    #[test]
    fn test_track_is_list_three_times() {
        let m = strip(3, MarqueeDirection::Forward);
        let slots: Vec<usize> = m.track().collect();
        assert_eq!(slots, vec![0, 1, 2, 0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_full_loop_closes() {
        for direction in [MarqueeDirection::Forward, MarqueeDirection::Reverse] {
            let mut m = strip(8, direction);
            let start = m.offset();

            // Uneven frame times that sum to exactly one loop
            let frames = [16u64, 17, 16, 17, 34];
            let mut total = 0u64;
            while total + 100 <= SPEED.as_millis() as u64 {
                for ms in frames {
                    m.advance(Duration::from_millis(ms));
                    total += ms;
                }
            }
            m.advance(Duration::from_millis(SPEED.as_millis() as u64 - total));
            assert_eq!(m.offset(), start, "{:?}", direction);
        }
    }

    #[test]
    fn test_forward_and_reverse_offsets() {
        let mut fwd = strip(4, MarqueeDirection::Forward);
        let mut rev = strip(4, MarqueeDirection::Reverse);
        assert_eq!(fwd.offset(), 0.0);
        assert_eq!(rev.offset(), -fwd.distance());

        fwd.advance(SPEED / 2);
        rev.advance(SPEED / 2);
        assert_eq!(fwd.offset(), -fwd.distance() / 2.0);
        assert_eq!(rev.offset(), -rev.distance() / 2.0);

        fwd.advance(SPEED / 4);
        assert!(fwd.offset() < -fwd.distance() / 2.0);
        assert!(fwd.offset() >= -fwd.distance());
    }

    #[test]
    fn test_hover_pauses_in_place() {
        let mut m = strip(5, MarqueeDirection::Forward);
        m.advance(Duration::from_secs(3));
        let before = m.offset();

        m.set_hovered(true);
        m.advance(Duration::from_secs(5));
        assert_eq!(m.offset(), before);

        m.set_hovered(false);
        m.advance(Duration::from_secs(1));
        assert!(m.offset() < before);
    }

    #[test]
    fn test_empty_strip_is_still() {
        let mut m = strip(0, MarqueeDirection::Forward);
        m.advance(Duration::from_secs(10));
        assert_eq!(m.distance(), 0.0);
        assert_eq!(m.offset(), 0.0);
        assert_eq!(m.track().count(), 0);
    }

    #[test]
    fn test_direction_names() {
        assert_eq!(MarqueeDirection::from_name("reverse"), MarqueeDirection::Reverse);
        assert_eq!(MarqueeDirection::from_name("Forward"), MarqueeDirection::Forward);
        assert_eq!(MarqueeDirection::from_name("sideways"), MarqueeDirection::Forward);
    }
}
