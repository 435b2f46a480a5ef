//! Streak and rolling-window arithmetic over a habit's completion dates.

use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

/// Length of the stats window, today included.
pub const WINDOW_DAYS: u64 = 7;

/// Consecutive completed days ending today. Zero if today is not completed.
pub fn streak(done: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut count = 0;
    let mut day = today;
    while done.contains(&day) {
        count += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    count
}

/// First day of the inclusive window ending `today`.
pub fn window_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(WINDOW_DAYS - 1))
        .unwrap_or(NaiveDate::MIN)
}

/// Completions within `[today - 6, today]`.
pub fn count_in_window(done: &BTreeSet<NaiveDate>, today: NaiveDate) -> usize {
    done.range(window_start(today)..=today).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days_before(today: NaiveDate, offsets: &[u64]) -> BTreeSet<NaiveDate> {
        offsets
            .iter()
            .map(|&n| today.checked_sub_days(Days::new(n)).unwrap())
            .collect()
    }

    fn today() -> NaiveDate {
        "2026-10-19".parse().unwrap()
    }

    #[test]
    fn test_streak_consecutive() {
        assert_eq!(streak(&days_before(today(), &[0, 1, 2]), today()), 3);
    }

    #[test]
    fn test_streak_stops_at_gap() {
        assert_eq!(streak(&days_before(today(), &[0, 2]), today()), 1);
        assert_eq!(streak(&days_before(today(), &[0, 1, 3, 4, 5]), today()), 2);
    }

    #[test]
    fn test_streak_zero_when_today_missing() {
        assert_eq!(streak(&days_before(today(), &[1, 2, 3]), today()), 0);
        assert_eq!(streak(&BTreeSet::new(), today()), 0);
    }

    #[test]
    fn test_streak_crosses_month_and_year() {
        let today: NaiveDate = "2027-01-01".parse().unwrap();
        assert_eq!(streak(&days_before(today, &[0, 1, 2, 3]), today), 4);
    }

    #[test]
    fn test_window_is_inclusive_seven_days() {
        assert_eq!(window_start(today()), "2026-10-13".parse::<NaiveDate>().unwrap());
        let done = days_before(today(), &[0, 3, 6, 7, 8]);
        assert_eq!(count_in_window(&done, today()), 3);
    }

    #[test]
    fn test_window_excludes_eight_days_ago() {
        let done = days_before(today(), &[8]);
        assert_eq!(count_in_window(&done, today()), 0);
    }

    #[test]
    fn test_window_full_week() {
        let done = days_before(today(), &[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(count_in_window(&done, today()), 7);
    }
}
