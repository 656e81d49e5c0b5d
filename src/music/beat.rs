//! Musical time measured in integer ticks.
//!
//! Start times and durations in a composition are [`Beat`] values. Keeping
//! them integral makes sequential composition exact: shifting by the length
//! of a fragment never accumulates floating-point drift, so concatenation is
//! associative and durations add up precisely.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// Ticks per beat. 960 divides cleanly by 2, 3, 4, 5, 6, 8, 10, 12, 15, 16,
/// 20, 24, 32, so common note values land on exact ticks.
pub const TICKS_PER_BEAT: u64 = 960;

/// A point or span in musical time at [`TICKS_PER_BEAT`] resolution.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Beat {
    ticks: u64,
}

impl Beat {
    /// The start of a composition.
    pub const ZERO: Beat = Beat { ticks: 0 };

    /// Create a `Beat` from a raw tick count.
    pub fn from_ticks(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Create a `Beat` from whole beats.
    pub fn from_beats(beats: u32) -> Self {
        Self {
            ticks: beats as u64 * TICKS_PER_BEAT,
        }
    }

    /// Create a `Beat` from a fractional beat value, rounded to the nearest tick.
    /// Negative or non-finite input clamps to zero.
    pub fn from_beats_f64(beats: f64) -> Self {
        if !beats.is_finite() || beats <= 0.0 {
            return Self::ZERO;
        }
        Self {
            ticks: (beats * TICKS_PER_BEAT as f64).round() as u64,
        }
    }

    pub fn ticks(self) -> u64 {
        self.ticks
    }

    pub fn is_zero(self) -> bool {
        self.ticks == 0
    }

    /// Convert to a floating-point beat value.
    pub fn as_beats_f64(self) -> f64 {
        self.ticks as f64 / TICKS_PER_BEAT as f64
    }

    /// Sum of two spans, or `None` past the last representable tick.
    pub fn checked_add(self, rhs: Beat) -> Option<Beat> {
        self.ticks.checked_add(rhs.ticks).map(Beat::from_ticks)
    }

    pub fn saturating_add(self, rhs: Beat) -> Beat {
        Beat::from_ticks(self.ticks.saturating_add(rhs.ticks))
    }

    /// Convert this position to a sample offset given BPM and sample rate.
    ///
    /// Formula: `(ticks * 60 * sample_rate) / (TICKS_PER_BEAT * bpm)`
    pub fn to_sample_offset(self, bpm: f64, sample_rate: u32) -> u64 {
        let numerator = self.ticks as f64 * 60.0 * sample_rate as f64;
        let denominator = TICKS_PER_BEAT as f64 * bpm;
        (numerator / denominator).round() as u64
    }
}

impl Ord for Beat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ticks.cmp(&other.ticks)
    }
}

impl PartialOrd for Beat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Beat {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            ticks: self.ticks + rhs.ticks,
        }
    }
}

impl Sub for Beat {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            ticks: self.ticks.saturating_sub(rhs.ticks),
        }
    }
}

impl fmt::Display for Beat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ticks % TICKS_PER_BEAT == 0 {
            write!(f, "{}", self.ticks / TICKS_PER_BEAT)
        } else {
            write!(f, "{}", self.as_beats_f64())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_zero_ticks() {
        assert_eq!(Beat::ZERO.ticks(), 0);
        assert!(Beat::ZERO.is_zero());
    }

    #[test]
    fn from_beats_converts_correctly() {
        assert_eq!(Beat::from_beats(1).ticks(), TICKS_PER_BEAT);
        assert_eq!(Beat::from_beats(4).ticks(), 4 * TICKS_PER_BEAT);
    }

    #[test]
    fn from_beats_f64_fractional() {
        assert_eq!(Beat::from_beats_f64(0.5).ticks(), TICKS_PER_BEAT / 2);
        assert_eq!(Beat::from_beats_f64(1.0 / 3.0).ticks(), TICKS_PER_BEAT / 3);
    }

    #[test]
    fn from_beats_f64_clamps_negative() {
        assert_eq!(Beat::from_beats_f64(-2.0), Beat::ZERO);
        assert_eq!(Beat::from_beats_f64(f64::NAN), Beat::ZERO);
    }

    #[test]
    fn addition_is_exact() {
        let third = Beat::from_beats_f64(1.0 / 3.0);
        assert_eq!(third + third + third, Beat::from_beats(1));
    }

    #[test]
    fn checked_addition_stops_at_the_last_tick() {
        let end = Beat::from_ticks(u64::MAX);
        assert_eq!(end.checked_add(Beat::ZERO), Some(end));
        assert_eq!(end.checked_add(Beat::from_ticks(1)), None);
        assert_eq!(end.saturating_add(Beat::from_beats(1)), end);
    }

    #[test]
    fn subtraction_saturates() {
        assert_eq!(Beat::from_beats(1) - Beat::from_beats(3), Beat::ZERO);
    }

    #[test]
    fn ordering() {
        assert!(Beat::from_beats(1) < Beat::from_beats(2));
    }

    #[test]
    fn to_sample_offset_at_120_bpm() {
        // At 120 BPM, 44100 Hz: one beat = 0.5 seconds = 22050 samples
        assert_eq!(Beat::from_beats(1).to_sample_offset(120.0, 44100), 22050);
    }

    #[test]
    fn display_whole_and_fractional() {
        assert_eq!(Beat::from_beats(3).to_string(), "3");
        assert_eq!(Beat::from_beats_f64(0.5).to_string(), "0.5");
    }
}
