//! Habit identity and reminder time primitives shared by the store and scheduler.

use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Normalize a habit name into its identity key.
///
/// Lowercases, collapses whitespace runs to a single space and trims, so
/// "Morning Run" and "  morning   run " are the same habit.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Current calendar date in the given timezone.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// A reminder time string was not a valid 24-hour `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid reminder time '{0}', expected HH:MM (00:00-23:59)")]
pub struct InvalidTime(pub String);

/// Local wall-clock time of a daily reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReminderTime {
    hour: u8,
    minute: u8,
}

impl ReminderTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, InvalidTime> {
        if hour > 23 || minute > 59 {
            return Err(InvalidTime(format!("{hour}:{minute}")));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        // Fields are range-checked on construction.
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl FromStr for ReminderTime {
    type Err = InvalidTime;

    /// Strict parse: exactly two ASCII digits, a colon, two ASCII digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || InvalidTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(bad)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(h) || !two_digits(m) {
            return Err(bad());
        }
        let hour: u8 = h.parse().map_err(|_| bad())?;
        let minute: u8 = m.parse().map_err(|_| bad())?;
        Self::new(hour, minute).map_err(|_| bad())
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for ReminderTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReminderTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_case_and_whitespace() {
        assert_eq!(normalize_name("Morning Run"), "morning run");
        assert_eq!(normalize_name("  morning \t  run \n"), "morning run");
        assert_eq!(normalize_name("Run  Fast"), normalize_name("run fast"));
    }

    #[test]
    fn test_normalize_cyrillic() {
        assert_eq!(normalize_name("Зарядка  20МИН"), "зарядка 20мин");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_parse_valid_times() {
        let t: ReminderTime = "08:30".parse().unwrap();
        assert_eq!((t.hour(), t.minute()), (8, 30));
        let t: ReminderTime = "00:00".parse().unwrap();
        assert_eq!(t.to_string(), "00:00");
        let t: ReminderTime = "23:59".parse().unwrap();
        assert_eq!(t.to_string(), "23:59");
    }

    #[test]
    fn test_parse_rejects_out_of_range_and_malformed() {
        for bad in ["24:00", "08:60", "7:30", "07:5", "0830", "ab:cd", "", "08:30:00", "+8:30"] {
            assert!(bad.parse::<ReminderTime>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_serde_as_string() {
        let t: ReminderTime = "09:05".parse().unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"09:05\"");
        let back: ReminderTime = serde_json::from_str("\"09:05\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<ReminderTime>("\"25:00\"").is_err());
    }
}
