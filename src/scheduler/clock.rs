//! Wall-clock arithmetic for daily reminders in a fixed timezone.

use chrono::{DateTime, Days, LocalResult, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use std::time::Duration;
use streak_core::habit::ReminderTime;

/// The first instant strictly after `now` whose local time in `tz` is `time`.
pub fn next_fire_after(now: DateTime<Tz>, time: ReminderTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let mut date = now.date_naive();
    loop {
        let candidate = at_local(tz, date, time);
        if candidate > now {
            return candidate;
        }
        date = match date.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => return candidate,
        };
    }
}

/// Resolve `date` at `time` in `tz`.
///
/// A time skipped by a DST jump is shifted forward by the size of the gap.
/// A time that happens twice takes the earlier instant.
pub fn at_local(tz: Tz, date: NaiveDate, time: ReminderTime) -> DateTime<Tz> {
    let naive = date.and_time(time.as_naive_time());
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // Offset in effect before the jump; reading the wall time with it
            // lands the same distance past the gap.
            let before = naive - chrono::Duration::days(1);
            let offset = tz.offset_from_utc_datetime(&before).fix();
            let utc = naive - chrono::Duration::seconds(i64::from(offset.local_minus_utc()));
            tz.from_utc_datetime(&utc)
        }
    }
}

/// Next fire time and how long to sleep for it, measured from the wall clock.
///
/// `last_fired` keeps a timer that woke slightly early from firing twice for
/// the same occurrence.
pub fn until_next_fire(
    tz: Tz,
    time: ReminderTime,
    last_fired: Option<DateTime<Tz>>,
) -> (DateTime<Tz>, Duration) {
    let now = Utc::now().with_timezone(&tz);
    let from = match last_fired {
        Some(prev) if prev > now => prev,
        _ => now,
    };
    let next = next_fire_after(from, time);
    let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
    (next, wait)
}
