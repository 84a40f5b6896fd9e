//! SM-2 recurrence and review-queue priority. Pure functions, no state.

use crate::Quality;
use chrono::{DateTime, Utc};

pub const EASINESS_MIN: f64 = 1.3;
pub const EASINESS_DEFAULT: f64 = 2.5;
pub const PASS_THRESHOLD: u8 = 3;
/// Longest interval a card can be given, about a hundred years.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Priority of a card that has never been reviewed. Nothing else can reach it.
pub const PRIORITY_NEW: f64 = f64::MAX;

const MS_PER_DAY: f64 = 86_400_000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sm2State {
    pub repetitions: u32,
    pub easiness: f64,
    pub interval: u32,
}

impl Default for Sm2State {
    fn default() -> Self {
        Self {
            repetitions: 0,
            easiness: EASINESS_DEFAULT,
            interval: 0,
        }
    }
}

/// Applies one rating to a scheduling state.
///
/// Easiness is updated before branching. A failing rating drops momentum
/// (repetitions and interval) but keeps the lowered easiness. Passing ratings
/// graduate through fixed 1 and 6 day steps before the interval starts
/// scaling with easiness.
pub fn next_state(quality: Quality, prev: Sm2State) -> Sm2State {
    let miss = f64::from(Quality::MAX - quality.value());
    let easiness = (prev.easiness + (0.1 - miss * (0.08 + miss * 0.02))).max(EASINESS_MIN);

    if !quality.is_pass() {
        return Sm2State {
            repetitions: 0,
            easiness,
            interval: 1,
        };
    }

    let repetitions = prev.repetitions + 1;
    let interval = match repetitions {
        1 => 1,
        2 => 6,
        _ => (f64::from(prev.interval) * easiness)
            .round()
            .min(f64::from(MAX_INTERVAL_DAYS)) as u32,
    };

    Sm2State {
        repetitions,
        easiness,
        interval,
    }
}

/// Ordering score for the due queue; higher is more urgent.
///
/// Overdue cards score above 100 and grow with how late they are, harder
/// cards slightly ahead. Cards not yet due score negative, soonest first.
pub fn priority(state: Sm2State, last_review: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(last) = last_review else {
        return PRIORITY_NEW;
    };

    let elapsed_days = (now - last).num_milliseconds() as f64 / MS_PER_DAY;
    let overdue = elapsed_days - f64::from(state.interval);

    if overdue > 0.0 {
        100.0 + overdue * 10.0 + (3.0 - state.easiness) * 5.0
    } else {
        -overdue.abs() * 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn q(v: u8) -> Quality {
        Quality::new(v).unwrap()
    }

    #[test]
    fn easiness_deltas_per_quality() {
        let base = Sm2State::default();
        let e = |v| next_state(q(v), base).easiness;
        assert!((e(5) - 2.6).abs() < 1e-9);
        assert!((e(4) - 2.5).abs() < 1e-9);
        assert!((e(3) - 2.36).abs() < 1e-9);
        assert!((e(2) - 2.18).abs() < 1e-9);
        assert!((e(1) - 1.96).abs() < 1e-9);
        assert!((e(0) - 1.7).abs() < 1e-9);
    }

    #[test]
    fn third_pass_scales_previous_interval() {
        let s = Sm2State {
            repetitions: 2,
            easiness: 2.5,
            interval: 6,
        };
        let next = next_state(q(5), s);
        assert_eq!(next.repetitions, 3);
        assert_eq!(next.interval, (6.0 * next.easiness).round() as u32);
        assert_eq!(next.interval, 16);
    }

    #[test]
    fn priority_overdue_and_future() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let s = Sm2State {
            repetitions: 2,
            easiness: 2.5,
            interval: 5,
        };

        let overdue = priority(s, Some(now - Duration::days(10)), now);
        assert!((overdue - (100.0 + 50.0 + 2.5)).abs() < 1e-9);

        let future = priority(s, Some(now - Duration::days(2)), now);
        assert!((future + 30.0).abs() < 1e-9);

        let sooner = priority(s, Some(now - Duration::days(4)), now);
        assert!(sooner > future);
    }

    #[test]
    fn harder_cards_lead_at_equal_lateness() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let last = Some(now - Duration::days(8));
        let hard = Sm2State {
            repetitions: 3,
            easiness: 1.5,
            interval: 4,
        };
        let easy = Sm2State { easiness: 2.8, ..hard };
        assert!(priority(hard, last, now) > priority(easy, last, now));
    }

    #[test]
    fn never_reviewed_outranks_everything() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let ancient = Sm2State {
            repetitions: 1,
            easiness: EASINESS_MIN,
            interval: 1,
        };
        let very_late = priority(ancient, Some(now - Duration::days(36_500)), now);
        assert!(priority(Sm2State::default(), None, now) >= very_late);
    }
}
