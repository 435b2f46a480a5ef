//! Habit ledger: per-user habit CRUD, completions, streaks and weekly stats.
//!
//! Every mutating call is one load-mutate-save cycle on the [`Store`]. Names
//! are normalized here too, so callers can pass raw text.
//!
//! "Today" is the calendar date in the configured timezone. Each operation
//! has an `*_on` variant taking an explicit date.

pub mod analytics;

#[cfg(test)]
mod tests;

use crate::document::HabitRecord;
use crate::store::{Mutation, Store};
use analytics::{count_in_window, streak, window_start};
use chrono::NaiveDate;
use chrono_tz::Tz;
use streak_core::{
    error::StreakError,
    habit::{normalize_name, today_in, ReminderTime},
};

/// Result of adding a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Created,
    AlreadyExists,
}

/// Result of removing a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Removed; `had_reminder` tells whether a reminder was removed with it.
    Removed { had_reminder: bool },
    NotFound,
}

/// Result of marking a habit done today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkOutcome {
    /// The habit did not exist and was created by this call.
    pub created: bool,
    /// Today was already marked; nothing changed.
    pub already_done: bool,
    /// Streak after the call.
    pub streak: u32,
}

/// One row of the habit list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitSummary {
    pub name: String,
    pub streak: u32,
    pub total_done: usize,
    pub reminder: Option<ReminderTime>,
}

/// One row of the weekly stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitWeek {
    pub name: String,
    pub done_in_window: usize,
    pub streak: u32,
}

/// Stats over the inclusive window `[start, end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyStats {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub habits: Vec<HabitWeek>,
}

/// Habit operations over the durable store.
#[derive(Clone)]
pub struct Ledger {
    store: Store,
    tz: Tz,
}

impl Ledger {
    pub fn new(store: Store, tz: Tz) -> Self {
        Self { store, tz }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Today's date in the ledger's timezone.
    pub fn today(&self) -> NaiveDate {
        today_in(self.tz)
    }

    pub async fn add_habit(&self, user_id: i64, name: &str) -> Result<AddOutcome, StreakError> {
        self.add_habit_on(user_id, name, self.today()).await
    }

    pub async fn add_habit_on(
        &self,
        user_id: i64,
        name: &str,
        today: NaiveDate,
    ) -> Result<AddOutcome, StreakError> {
        let name = normalize_name(name);
        self.store
            .update(user_id, move |user| {
                if user.habits.insert(name, HabitRecord::new(today)) {
                    Mutation::Changed(AddOutcome::Created)
                } else {
                    Mutation::Unchanged(AddOutcome::AlreadyExists)
                }
            })
            .await
    }

    /// Remove a habit together with its persisted reminder.
    ///
    /// The live timer, if any, is the scheduler's to disarm.
    pub async fn remove_habit(
        &self,
        user_id: i64,
        name: &str,
    ) -> Result<RemoveOutcome, StreakError> {
        let name = normalize_name(name);
        self.store
            .update(user_id, move |user| {
                if user.habits.remove(&name).is_none() {
                    return Mutation::Unchanged(RemoveOutcome::NotFound);
                }
                let had_reminder = user.reminders.remove(&name).is_some();
                Mutation::Changed(RemoveOutcome::Removed { had_reminder })
            })
            .await
    }

    /// Mark a habit done today, creating it first if it does not exist.
    pub async fn mark_done(&self, user_id: i64, name: &str) -> Result<MarkOutcome, StreakError> {
        self.mark_done_on(user_id, name, self.today()).await
    }

    pub async fn mark_done_on(
        &self,
        user_id: i64,
        name: &str,
        today: NaiveDate,
    ) -> Result<MarkOutcome, StreakError> {
        let name = normalize_name(name);
        self.store
            .update(user_id, move |user| {
                let (habit, created) = user
                    .habits
                    .get_or_insert_with(name, || HabitRecord::new(today));
                let newly_marked = habit.mark(today);
                let outcome = MarkOutcome {
                    created,
                    already_done: !newly_marked,
                    streak: streak(&habit.done_dates, today),
                };
                if created || newly_marked {
                    Mutation::Changed(outcome)
                } else {
                    Mutation::Unchanged(outcome)
                }
            })
            .await
    }

    pub async fn has_habit(&self, user_id: i64, name: &str) -> Result<bool, StreakError> {
        let user = self.store.user(user_id).await?;
        Ok(user.habits.contains(&normalize_name(name)))
    }

    /// Habits in insertion order with streak, total completions and reminder.
    pub async fn list_habits(&self, user_id: i64) -> Result<Vec<HabitSummary>, StreakError> {
        self.list_habits_on(user_id, self.today()).await
    }

    pub async fn list_habits_on(
        &self,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<HabitSummary>, StreakError> {
        let user = self.store.user(user_id).await?;
        Ok(user
            .habits
            .iter()
            .map(|(name, habit)| HabitSummary {
                name: name.to_string(),
                streak: streak(&habit.done_dates, today),
                total_done: habit.done_dates.len(),
                reminder: user.reminders.get(name).copied(),
            })
            .collect())
    }

    /// Completions in the 7-day window ending today, per habit.
    pub async fn stats(&self, user_id: i64) -> Result<WeeklyStats, StreakError> {
        self.stats_on(user_id, self.today()).await
    }

    pub async fn stats_on(
        &self,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<WeeklyStats, StreakError> {
        let user = self.store.user(user_id).await?;
        let habits = user
            .habits
            .iter()
            .map(|(name, habit)| HabitWeek {
                name: name.to_string(),
                done_in_window: count_in_window(&habit.done_dates, today),
                streak: streak(&habit.done_dates, today),
            })
            .collect();
        Ok(WeeklyStats {
            start: window_start(today),
            end: today,
            habits,
        })
    }

    /// A user's reminders, ordered by time then name.
    pub async fn reminders(&self, user_id: i64) -> Result<Vec<(String, ReminderTime)>, StreakError> {
        let user = self.store.user(user_id).await?;
        let mut out: Vec<(String, ReminderTime)> = user.reminders.into_iter().collect();
        out.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(out)
    }

    /// Persist a reminder time, replacing any previous one. Creates the habit
    /// if it does not exist yet. Returns the replaced time.
    pub async fn set_reminder(
        &self,
        user_id: i64,
        name: &str,
        time: ReminderTime,
    ) -> Result<Option<ReminderTime>, StreakError> {
        let name = normalize_name(name);
        let today = self.today();
        self.store
            .update(user_id, move |user| {
                let (_, created) = user
                    .habits
                    .get_or_insert_with(name.clone(), || HabitRecord::new(today));
                let previous = user.reminders.insert(name, time);
                if created || previous != Some(time) {
                    Mutation::Changed(previous)
                } else {
                    Mutation::Unchanged(previous)
                }
            })
            .await
    }

    /// Delete a persisted reminder. Returns whether one existed.
    pub async fn clear_reminder(&self, user_id: i64, name: &str) -> Result<bool, StreakError> {
        let name = normalize_name(name);
        self.store
            .update(user_id, move |user| {
                if user.reminders.remove(&name).is_some() {
                    Mutation::Changed(true)
                } else {
                    Mutation::Unchanged(false)
                }
            })
            .await
    }
}
