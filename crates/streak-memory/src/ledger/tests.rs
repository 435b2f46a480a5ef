use super::*;
use crate::store::JsonFileBackend;
use chrono::Days;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn test_dir() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "__streak_ledger_test_{}_{}__",
        std::process::id(),
        id
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn ledger(dir: &std::path::Path) -> Ledger {
    let backend = JsonFileBackend::new(dir.join("data.json")).unwrap();
    Ledger::new(Store::with_backend(Arc::new(backend)), chrono_tz::Europe::Moscow)
}

fn today() -> NaiveDate {
    "2026-10-19".parse().unwrap()
}

fn ago(n: u64) -> NaiveDate {
    today().checked_sub_days(Days::new(n)).unwrap()
}

#[tokio::test]
async fn test_add_habit_twice() {
    let dir = test_dir();
    let l = ledger(&dir);
    assert_eq!(l.add_habit_on(1, "Read", today()).await.unwrap(), AddOutcome::Created);
    assert_eq!(
        l.add_habit_on(1, "  read ", today()).await.unwrap(),
        AddOutcome::AlreadyExists
    );
    assert_eq!(l.list_habits_on(1, today()).await.unwrap().len(), 1);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_mark_done_is_idempotent() {
    let dir = test_dir();
    let l = ledger(&dir);
    let first = l.mark_done_on(1, "walk", today()).await.unwrap();
    assert!(first.created);
    assert!(!first.already_done);
    assert_eq!(first.streak, 1);

    let second = l.mark_done_on(1, "walk", today()).await.unwrap();
    assert!(!second.created);
    assert!(second.already_done);
    assert_eq!(second.streak, 1);

    let list = l.list_habits_on(1, today()).await.unwrap();
    assert_eq!(list[0].total_done, 1);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_streak_over_consecutive_days() {
    let dir = test_dir();
    let l = ledger(&dir);
    for n in [2, 1, 0] {
        l.mark_done_on(1, "stretch", ago(n)).await.unwrap();
    }
    let list = l.list_habits_on(1, today()).await.unwrap();
    assert_eq!(list[0].streak, 3);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_streak_breaks_on_gap() {
    let dir = test_dir();
    let l = ledger(&dir);
    l.mark_done_on(1, "stretch", ago(2)).await.unwrap();
    let outcome = l.mark_done_on(1, "stretch", today()).await.unwrap();
    assert_eq!(outcome.streak, 1);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_stats_window_excludes_old_days() {
    let dir = test_dir();
    let l = ledger(&dir);
    for n in [0, 3, 6, 8] {
        l.mark_done_on(1, "swim", ago(n)).await.unwrap();
    }
    l.add_habit_on(1, "piano", today()).await.unwrap();

    let stats = l.stats_on(1, today()).await.unwrap();
    assert_eq!(stats.start, ago(6));
    assert_eq!(stats.end, today());
    assert_eq!(
        stats.habits,
        vec![
            HabitWeek {
                name: "swim".into(),
                done_in_window: 3,
                streak: 1,
            },
            HabitWeek {
                name: "piano".into(),
                done_in_window: 0,
                streak: 0,
            },
        ]
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_names_are_normalized_everywhere() {
    let dir = test_dir();
    let l = ledger(&dir);
    l.add_habit_on(1, "Run  Fast", today()).await.unwrap();
    assert!(l.has_habit(1, "run fast").await.unwrap());
    let outcome = l.mark_done_on(1, "RUN FAST", today()).await.unwrap();
    assert!(!outcome.created);
    let list = l.list_habits_on(1, today()).await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "run fast");
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_users_are_isolated() {
    let dir = test_dir();
    let l = ledger(&dir);
    l.add_habit_on(1, "tea", today()).await.unwrap();
    assert!(l.list_habits_on(2, today()).await.unwrap().is_empty());
    assert_eq!(l.remove_habit(2, "tea").await.unwrap(), RemoveOutcome::NotFound);
    assert!(l.has_habit(1, "tea").await.unwrap());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_list_keeps_insertion_order() {
    let dir = test_dir();
    let l = ledger(&dir);
    for name in ["zen", "apples", "mid"] {
        l.add_habit_on(1, name, today()).await.unwrap();
    }
    let names: Vec<String> = l
        .list_habits_on(1, today())
        .await
        .unwrap()
        .into_iter()
        .map(|h| h.name)
        .collect();
    assert_eq!(names, ["zen", "apples", "mid"]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_add_mark_remove_scenario() {
    let dir = test_dir();
    let l = ledger(&dir);
    assert_eq!(
        l.add_habit_on(12345, "zaryadka", today()).await.unwrap(),
        AddOutcome::Created
    );
    assert_eq!(l.mark_done_on(12345, "zaryadka", today()).await.unwrap().streak, 1);
    let again = l.mark_done_on(12345, "zaryadka", today()).await.unwrap();
    assert!(again.already_done);
    assert_eq!(again.streak, 1);
    assert_eq!(
        l.remove_habit(12345, "zaryadka").await.unwrap(),
        RemoveOutcome::Removed { had_reminder: false }
    );
    assert!(l.list_habits_on(12345, today()).await.unwrap().is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_remove_drops_reminder() {
    let dir = test_dir();
    let l = ledger(&dir);
    l.add_habit(1, "water").await.unwrap();
    l.set_reminder(1, "water", "09:00".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(
        l.remove_habit(1, "water").await.unwrap(),
        RemoveOutcome::Removed { had_reminder: true }
    );
    assert!(l.reminders(1).await.unwrap().is_empty());
    assert!(l.store().all_reminders().await.unwrap().is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_set_reminder_creates_habit_and_replaces_time() {
    let dir = test_dir();
    let l = ledger(&dir);
    let nine: ReminderTime = "09:00".parse().unwrap();
    let ten: ReminderTime = "10:30".parse().unwrap();

    assert_eq!(l.set_reminder(1, "Yoga", nine).await.unwrap(), None);
    assert!(l.has_habit(1, "yoga").await.unwrap());
    assert_eq!(l.set_reminder(1, "yoga", ten).await.unwrap(), Some(nine));

    let list = l.list_habits(1).await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].reminder, Some(ten));
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_reminders_sorted_by_time() {
    let dir = test_dir();
    let l = ledger(&dir);
    l.set_reminder(1, "late", "21:00".parse().unwrap()).await.unwrap();
    l.set_reminder(1, "early", "06:45".parse().unwrap()).await.unwrap();
    l.set_reminder(1, "also early", "06:45".parse().unwrap()).await.unwrap();
    let names: Vec<String> = l
        .reminders(1)
        .await
        .unwrap()
        .into_iter()
        .map(|(n, _)| n)
        .collect();
    assert_eq!(names, ["also early", "early", "late"]);
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_clear_reminder_keeps_habit() {
    let dir = test_dir();
    let l = ledger(&dir);
    l.set_reminder(1, "floss", "22:00".parse().unwrap()).await.unwrap();
    assert!(l.clear_reminder(1, "floss").await.unwrap());
    assert!(!l.clear_reminder(1, "floss").await.unwrap());
    assert!(l.has_habit(1, "floss").await.unwrap());
    assert!(l.reminders(1).await.unwrap().is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let dir = test_dir();
    {
        let l = ledger(&dir);
        l.mark_done_on(7, "journal", ago(1)).await.unwrap();
        l.mark_done_on(7, "journal", today()).await.unwrap();
        l.set_reminder(7, "journal", "20:15".parse().unwrap()).await.unwrap();
    }
    let l = ledger(&dir);
    let list = l.list_habits_on(7, today()).await.unwrap();
    assert_eq!(list[0].streak, 2);
    assert_eq!(list[0].reminder.unwrap().to_string(), "20:15");
    let _ = std::fs::remove_dir_all(&dir);
}
