//! Leitner-box spaced repetition
//!
//! Pure functions over [`ModuleStats`]: no I/O, no clock access. Callers pass
//! `now` explicitly and are responsible for keeping `current_box` in 1..=5
//! (the stats constructor and on-disk normalization both clamp).
//!
//! Boxes map to fixed review intervals in days:
//! 1 → 1, 2 → 2, 3 → 7, 4 → 14, 5 → 30. A pass moves a module up one box, a
//! fail resets it to box 1. Box 5 is a ceiling, not an exit: a module that
//! keeps passing stays on a 30-day cadence indefinitely — the model is
//! continuous maintenance review, not graduation.

use chrono::{DateTime, Duration, Utc};

use crate::module::ModuleStats;

/// Lowest (least mastered) Leitner box.
pub const MIN_BOX: u8 = 1;

/// Highest box; also the ceiling for passes.
pub const MAX_BOX: u8 = 5;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Review interval in calendar days for a box. Out-of-range boxes are
/// clamped.
pub fn interval_days(current_box: u8) -> i64 {
    match current_box.clamp(MIN_BOX, MAX_BOX) {
        1 => 1,
        2 => 2,
        3 => 7,
        4 => 14,
        _ => 30,
    }
}

/// Next review date for a box, counted from `from`.
pub fn next_review_date(current_box: u8, from: DateTime<Utc>) -> DateTime<Utc> {
    from + Duration::days(interval_days(current_box))
}

/// Review priority: how urgently a module needs attention at `now`.
///
/// Overdue days are weighted ten-fold; the box level only breaks ties,
/// favoring lower (less mastered) boxes. Missing stats rank at zero.
pub fn priority(stats: Option<&ModuleStats>, now: DateTime<Utc>) -> f64 {
    let Some(stats) = stats else {
        return 0.0;
    };

    let days_overdue =
        (now - stats.next_review_date).num_seconds() as f64 / SECONDS_PER_DAY;
    let urgency = if days_overdue > 0.0 {
        days_overdue * 10.0
    } else {
        days_overdue
    };

    urgency + f64::from(6 - stats.current_box.clamp(MIN_BOX, MAX_BOX)) * 0.1
}

/// Advance a module's schedule after a graded attempt.
///
/// Pass: up one box, capped at [`MAX_BOX`]. Fail: back to box 1. The new due
/// date is the new box's interval counted from `now`. `last_review_date` is
/// left untouched; the caller stamps it from the graded submission.
pub fn advance(stats: &ModuleStats, passed: bool, now: DateTime<Utc>) -> ModuleStats {
    let current = stats.current_box.clamp(MIN_BOX, MAX_BOX);
    let new_box = if passed {
        (current + 1).min(MAX_BOX)
    } else {
        MIN_BOX
    };

    ModuleStats {
        module_id: stats.module_id.clone(),
        current_box: new_box,
        last_review_date: stats.last_review_date,
        next_review_date: next_review_date(new_box, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stats(current_box: u8, next_review_date: DateTime<Utc>) -> ModuleStats {
        ModuleStats {
            module_id: "m-1".to_string(),
            current_box,
            last_review_date: None,
            next_review_date,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_intervals_are_exact_calendar_days() {
        for (b, days) in [(1u8, 1i64), (2, 2), (3, 7), (4, 14), (5, 30)] {
            assert_eq!(interval_days(b), days);
            let from = noon();
            assert_eq!(next_review_date(b, from) - from, Duration::days(days));
        }
    }

    #[test]
    fn test_pass_never_decreases_box() {
        for b in MIN_BOX..=MAX_BOX {
            let advanced = advance(&stats(b, noon()), true, noon());
            assert!(advanced.current_box >= b);
            assert!(advanced.current_box <= MAX_BOX);
        }
    }

    #[test]
    fn test_fail_always_resets_to_box_one() {
        for b in MIN_BOX..=MAX_BOX {
            let advanced = advance(&stats(b, noon()), false, noon());
            assert_eq!(advanced.current_box, 1);
            assert_eq!(advanced.next_review_date, noon() + Duration::days(1));
        }
    }

    #[test]
    fn test_advance_is_pure() {
        let input = stats(3, noon());
        let a = advance(&input, true, noon());
        let b = advance(&input, true, noon());
        assert_eq!(a, b);
        assert_eq!(input.current_box, 3);
    }

    #[test]
    fn test_box_one_pass_moves_to_box_two_due_in_two_days() {
        let advanced = advance(&stats(1, noon()), true, noon());
        assert_eq!(advanced.current_box, 2);
        assert_eq!(advanced.next_review_date, noon() + Duration::days(2));
    }

    #[test]
    fn test_box_five_pass_stays_at_ceiling() {
        let advanced = advance(&stats(5, noon()), true, noon());
        assert_eq!(advanced.current_box, 5);
        assert_eq!(advanced.next_review_date, noon() + Duration::days(30));
    }

    #[test]
    fn test_priority_of_missing_stats_is_zero() {
        assert_eq!(priority(None, noon()), 0.0);
    }

    #[test]
    fn test_priority_increases_with_overdue_days() {
        let now = noon();
        let overdue_1d = stats(3, now - Duration::days(1));
        let overdue_3d = stats(3, now - Duration::days(3));
        let future_1d = stats(3, now + Duration::days(1));
        let future_3d = stats(3, now + Duration::days(3));

        assert!(priority(Some(&overdue_3d), now) > priority(Some(&overdue_1d), now));
        assert!(priority(Some(&overdue_1d), now) > priority(Some(&future_1d), now));
        assert!(priority(Some(&future_1d), now) > priority(Some(&future_3d), now));
    }

    #[test]
    fn test_priority_ties_favor_lower_boxes() {
        let now = noon();
        let due = now - Duration::days(2);
        for b in MIN_BOX..MAX_BOX {
            assert!(
                priority(Some(&stats(b, due)), now) > priority(Some(&stats(b + 1, due)), now)
            );
        }
    }

    #[test]
    fn test_overdue_dominates_box_level() {
        let now = noon();
        // A box-5 module two days overdue outranks a box-1 module due now.
        let overdue_high_box = stats(5, now - Duration::days(2));
        let fresh_low_box = stats(1, now);
        assert!(priority(Some(&overdue_high_box), now) > priority(Some(&fresh_low_box), now));
    }
}
