use super::*;
use chrono::NaiveDate;
use streak_memory::ledger::{HabitSummary, HabitWeek, WeeklyStats};

const KEYS: &[&str] = &[
    "help",
    "no_habits",
    "no_habits_stats",
    "list_header",
    "list_footer",
    "stats_footer",
    "done_count",
    "streak",
    "reminders_header",
    "no_reminders",
    "usage_remove",
    "usage_done",
    "usage_remind",
    "usage_unremind",
    "storage_error",
    "reminder_hint",
];

#[test]
fn test_all_keys_exist_in_both_languages() {
    for key in KEYS {
        assert_ne!(t(key, "English"), "???", "{key} missing in English");
        assert_ne!(t(key, "Russian"), "???", "{key} missing in Russian");
        assert_ne!(t(key, "English"), t(key, "Russian"), "{key} not translated");
    }
}

#[test]
fn test_unknown_language_falls_back_to_english() {
    assert_eq!(t("help", "Klingon"), t("help", "English"));
    assert_eq!(habit_added("Klingon", "x"), habit_added("English", "x"));
}

#[test]
fn test_unknown_key() {
    assert_eq!(t("nonexistent_key", "Russian"), "???");
}

#[test]
fn test_russian_day_plurals() {
    assert!(marked_done("Russian", "бег", 1, false).ends_with("1 день"));
    assert!(marked_done("Russian", "бег", 3, false).ends_with("3 дня"));
    assert!(marked_done("Russian", "бег", 5, false).ends_with("5 дней"));
    assert!(marked_done("Russian", "бег", 11, false).ends_with("11 дней"));
    assert!(marked_done("Russian", "бег", 22, false).ends_with("22 дня"));
    assert!(already_done("English", "run", 1).ends_with("Streak: 1 day"));
    assert!(already_done("English", "run", 4).ends_with("Streak: 4 days"));
}

#[test]
fn test_habit_list_shows_reminder() {
    let habits = vec![
        HabitSummary {
            name: "зарядка".into(),
            streak: 2,
            total_done: 5,
            reminder: Some("08:30".parse().unwrap()),
        },
        HabitSummary {
            name: "чтение".into(),
            streak: 0,
            total_done: 0,
            reminder: None,
        },
    ];
    let text = habit_list("Russian", &habits);
    assert!(text.starts_with("📋 Твои привычки:"));
    assert!(text.contains("• зарядка — выполнено: 5, серия: 2 ⏰ 08:30"));
    assert!(text.contains("• чтение — выполнено: 0, серия: 0\n"));
}

#[test]
fn test_empty_list_and_stats() {
    assert_eq!(habit_list("English", &[]), t("no_habits", "English"));
    let stats = WeeklyStats {
        start: NaiveDate::from_ymd_opt(2026, 10, 13).unwrap(),
        end: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        habits: vec![],
    };
    assert_eq!(weekly_stats("Russian", &stats), t("no_habits_stats", "Russian"));
}

#[test]
fn test_weekly_stats_header_and_rows() {
    let stats = WeeklyStats {
        start: NaiveDate::from_ymd_opt(2026, 10, 13).unwrap(),
        end: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        habits: vec![HabitWeek {
            name: "swim".into(),
            done_in_window: 3,
            streak: 1,
        }],
    };
    let text = weekly_stats("English", &stats);
    assert!(text.starts_with("📊 Stats for the last 7 days (2026-10-13 — 2026-10-19):"));
    assert!(text.contains("• swim: 3/7"));
}

#[test]
fn test_reminder_texts() {
    let t830 = "08:30".parse().unwrap();
    assert!(reminder_set("English", "yoga", t830).contains("08:30"));
    assert!(reminder_text("Russian", "йога").contains("«йога»"));
    let list = reminder_list("English", &[("yoga".into(), t830)]);
    assert!(list.contains("• 08:30 — yoga"));
    assert_eq!(reminder_list("Russian", &[]), t("no_reminders", "Russian"));
}
