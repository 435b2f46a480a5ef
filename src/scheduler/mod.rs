//! Reminder scheduler: one tokio timer task per `(user, habit)` reminder.
//!
//! The registry maps each key to its live timer. Arming a key always aborts
//! the previous timer first, under the registry lock, so a key never has two
//! live timers. Persistence goes through the [`Ledger`]; firing only talks to
//! the [`Notifier`] and never reads or writes the store.

pub mod clock;


use crate::i18n;
use chrono_tz::Tz;
use std::collections::HashMap;
use std::sync::Arc;
use streak_core::{
    error::StreakError,
    habit::{normalize_name, ReminderTime},
    traits::Notifier,
};
use streak_memory::Ledger;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Registry key: one reminder per habit per user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReminderKey {
    pub user_id: i64,
    pub habit: String,
}

impl ReminderKey {
    pub fn new(user_id: i64, habit: &str) -> Self {
        Self {
            user_id,
            habit: normalize_name(habit),
        }
    }
}

struct ArmedTimer {
    time: ReminderTime,
    handle: JoinHandle<()>,
}

/// Result of a schedule request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Persisted and armed. `previous` is the replaced time, if any.
    Armed {
        time: ReminderTime,
        previous: Option<ReminderTime>,
    },
    /// The time was not a valid `HH:MM`; nothing changed.
    InvalidTime,
}

/// Owns every live reminder timer.
pub struct ReminderScheduler {
    ledger: Ledger,
    notifier: Arc<dyn Notifier>,
    language: String,
    timers: Mutex<HashMap<ReminderKey, ArmedTimer>>,
}

impl ReminderScheduler {
    pub fn new(ledger: Ledger, notifier: Arc<dyn Notifier>, language: &str) -> Self {
        Self {
            ledger,
            notifier,
            language: language.to_string(),
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Persist a daily reminder and arm it, replacing any existing one.
    ///
    /// Creates the habit if it does not exist yet.
    pub async fn schedule(
        &self,
        user_id: i64,
        habit: &str,
        time: &str,
    ) -> Result<ScheduleOutcome, StreakError> {
        let Ok(time) = time.parse::<ReminderTime>() else {
            return Ok(ScheduleOutcome::InvalidTime);
        };
        let key = ReminderKey::new(user_id, habit);
        let previous = self.ledger.set_reminder(user_id, &key.habit, time).await?;
        info!(
            "scheduler: reminder for user {user_id} '{}' set to {time}",
            key.habit
        );
        self.arm(key, time).await;
        Ok(ScheduleOutcome::Armed { time, previous })
    }

    /// Remove a persisted reminder and its live timer. Returns whether a
    /// reminder was persisted.
    pub async fn unschedule(&self, user_id: i64, habit: &str) -> Result<bool, StreakError> {
        let key = ReminderKey::new(user_id, habit);
        let existed = self.ledger.clear_reminder(user_id, &key.habit).await?;
        self.disarm_key(&key).await;
        if existed {
            info!("scheduler: reminder for user {user_id} '{}' removed", key.habit);
        }
        Ok(existed)
    }

    /// Cancel the live timer only. The persisted reminder is left alone.
    pub async fn disarm(&self, user_id: i64, habit: &str) -> bool {
        self.disarm_key(&ReminderKey::new(user_id, habit)).await
    }

    /// Arm every persisted reminder. Returns how many were armed.
    pub async fn restore_all(&self) -> Result<usize, StreakError> {
        let reminders = self.ledger.store().all_reminders().await?;
        let count = reminders.len();
        for (user_id, habit, time) in reminders {
            self.arm(ReminderKey::new(user_id, &habit), time).await;
        }
        info!("scheduler: restored {count} reminder(s)");
        Ok(count)
    }

    /// Snapshot of live timers, sorted by key.
    pub async fn armed(&self) -> Vec<(ReminderKey, ReminderTime)> {
        let timers = self.timers.lock().await;
        let mut out: Vec<_> = timers
            .iter()
            .map(|(key, timer)| (key.clone(), timer.time))
            .collect();
        out.sort();
        out
    }

    /// Abort every live timer.
    pub async fn shutdown(&self) {
        let mut timers = self.timers.lock().await;
        for (_, timer) in timers.drain() {
            timer.handle.abort();
        }
        info!("scheduler: all timers stopped");
    }

    async fn disarm_key(&self, key: &ReminderKey) -> bool {
        match self.timers.lock().await.remove(key) {
            Some(timer) => {
                timer.handle.abort();
                debug!("scheduler: disarmed {key:?}");
                true
            }
            None => false,
        }
    }

    /// Cancel-before-create under the registry lock.
    async fn arm(&self, key: ReminderKey, time: ReminderTime) {
        let mut timers = self.timers.lock().await;
        if let Some(old) = timers.remove(&key) {
            old.handle.abort();
        }
        let handle = tokio::spawn(timer_loop(
            key.clone(),
            time,
            self.ledger.timezone(),
            self.notifier.clone(),
            i18n::reminder_text(&self.language, &key.habit),
        ));
        timers.insert(key, ArmedTimer { time, handle });
    }
}

/// Sleep until the next local `time`, deliver, repeat daily.
async fn timer_loop(
    key: ReminderKey,
    time: ReminderTime,
    tz: Tz,
    notifier: Arc<dyn Notifier>,
    text: String,
) {
    let mut last_fired = None;
    loop {
        let (next, wait) = clock::until_next_fire(tz, time, last_fired);
        debug!("scheduler: {key:?} next fire at {next}");
        tokio::time::sleep(wait).await;

        match notifier.deliver(key.user_id, &text).await {
            Ok(()) => info!(
                "scheduler: delivered reminder to user {} for '{}'",
                key.user_id, key.habit
            ),
            Err(e) => warn!(
                "scheduler: reminder delivery to user {} failed: {e}",
                key.user_id
            ),
        }
        last_fired = Some(next);
    }
}
