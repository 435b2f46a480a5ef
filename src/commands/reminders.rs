//! Reminder command handlers: schedule, unschedule, list.

use super::{storage_failed, CommandContext};
use crate::i18n;
use crate::scheduler::ScheduleOutcome;

pub(super) async fn handle_schedule(ctx: &CommandContext<'_>, habit: &str, time: &str) -> String {
    match ctx.scheduler.schedule(ctx.user_id, habit, time).await {
        Ok(ScheduleOutcome::Armed {
            time,
            previous: Some(previous),
        }) if previous != time => i18n::reminder_moved(ctx.lang, habit, previous, time),
        Ok(ScheduleOutcome::Armed { time, .. }) => i18n::reminder_set(ctx.lang, habit, time),
        Ok(ScheduleOutcome::InvalidTime) => i18n::invalid_time(ctx.lang, time),
        Err(e) => storage_failed(ctx, e),
    }
}

pub(super) async fn handle_unschedule(ctx: &CommandContext<'_>, habit: &str) -> String {
    match ctx.scheduler.unschedule(ctx.user_id, habit).await {
        Ok(true) => i18n::reminder_cleared(ctx.lang, habit),
        Ok(false) => i18n::reminder_not_set(ctx.lang, habit),
        Err(e) => storage_failed(ctx, e),
    }
}

pub(super) async fn handle_list(ctx: &CommandContext<'_>) -> String {
    match ctx.ledger.reminders(ctx.user_id).await {
        Ok(reminders) => i18n::reminder_list(ctx.lang, &reminders),
        Err(e) => storage_failed(ctx, e),
    }
}
