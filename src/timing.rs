//! Round boundary arithmetic.
//!
//! A round index is a pure function of wall-clock time and the configured
//! interval. Five-minute rounds tile the epoch directly; daily rounds are
//! shifted by six hours so the reset lands at a fixed daily time instead
//! of UTC midnight.

const FIVE_MINUTES_MS: i64 = 5 * 60 * 1000;
const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;
const DAILY_SHIFT_MS: i64 = 6 * 60 * 60 * 1000;

/// Cadence of a game instance. Each interval maps to its own game contract
/// (see `chain::GameConfig`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundInterval {
    FiveMinutes,
    OneDay,
}

impl RoundInterval {
    pub const fn duration_ms(self) -> i64 {
        match self {
            RoundInterval::FiveMinutes => FIVE_MINUTES_MS,
            RoundInterval::OneDay => ONE_DAY_MS,
        }
    }

    /// Round index containing the given wall-clock instant (ms since epoch).
    pub fn round_for(self, now_ms: i64) -> u64 {
        let shifted = match self {
            RoundInterval::FiveMinutes => now_ms,
            RoundInterval::OneDay => now_ms + DAILY_SHIFT_MS,
        };
        shifted.div_euclid(self.duration_ms()) as u64
    }

    /// Inverse of [`round_for`](Self::round_for): the half-open time window
    /// `[start_ms, end_ms)` the round occupies.
    pub fn bounds(self, round: u64) -> RoundWindow {
        let start_ms = match self {
            RoundInterval::FiveMinutes => round as i64 * FIVE_MINUTES_MS,
            RoundInterval::OneDay => round as i64 * ONE_DAY_MS - DAILY_SHIFT_MS,
        };
        RoundWindow {
            start_ms,
            end_ms: start_ms + self.duration_ms(),
        }
    }
}

/// Wall-clock window of one round, in ms since epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl RoundWindow {
    pub fn contains(&self, now_ms: i64) -> bool {
        now_ms >= self.start_ms && now_ms < self.end_ms
    }

    pub fn has_ended(&self, now_ms: i64) -> bool {
        now_ms >= self.end_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_minute_round_seven() {
        let now = 1000 * 300 * 7 + 10_000;
        assert_eq!(RoundInterval::FiveMinutes.round_for(now), 7);
        let window = RoundInterval::FiveMinutes.bounds(7);
        assert_eq!(window.start_ms, 2_100_000);
        assert_eq!(window.end_ms, 2_400_000);
        assert!(window.contains(now));
    }

    #[test]
    fn daily_round_is_shifted_by_six_hours() {
        // 2024-01-10 00:00:00 UTC
        let midnight = 1_704_844_800_000;
        let round = RoundInterval::OneDay.round_for(midnight);
        let window = RoundInterval::OneDay.bounds(round);
        // The containing window starts at 18:00 the previous day.
        assert_eq!(window.start_ms, midnight - DAILY_SHIFT_MS);
        assert_eq!(window.end_ms - window.start_ms, ONE_DAY_MS);
        assert!(window.contains(midnight));
    }

    #[test]
    fn round_index_is_monotonic() {
        for interval in [RoundInterval::FiveMinutes, RoundInterval::OneDay] {
            let mut last = 0;
            for step in 0..500 {
                let now = step * 37_000_000;
                let round = interval.round_for(now);
                assert!(round >= last);
                assert!(interval.bounds(round).contains(now));
                last = round;
            }
        }
    }

    #[test]
    fn window_edges_are_half_open() {
        let window = RoundInterval::FiveMinutes.bounds(7);
        assert!(window.contains(window.start_ms));
        assert!(!window.contains(window.end_ms));
        assert!(window.has_ended(window.end_ms));
        assert!(!window.has_ended(window.end_ms - 1));
    }
}
