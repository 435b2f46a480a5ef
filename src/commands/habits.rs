//! Habit command handlers: list, stats, remove, mark done, implicit text.

use super::{storage_failed, CommandContext};
use crate::i18n;
use streak_memory::ledger::{AddOutcome, RemoveOutcome};
use tracing::debug;

pub(super) async fn handle_list(ctx: &CommandContext<'_>) -> String {
    match ctx.ledger.list_habits(ctx.user_id).await {
        Ok(habits) => i18n::habit_list(ctx.lang, &habits),
        Err(e) => storage_failed(ctx, e),
    }
}

pub(super) async fn handle_stats(ctx: &CommandContext<'_>) -> String {
    match ctx.ledger.stats(ctx.user_id).await {
        Ok(stats) => i18n::weekly_stats(ctx.lang, &stats),
        Err(e) => storage_failed(ctx, e),
    }
}

pub(super) async fn handle_remove(ctx: &CommandContext<'_>, name: &str) -> String {
    match ctx.ledger.remove_habit(ctx.user_id, name).await {
        Ok(RemoveOutcome::Removed { had_reminder }) => {
            if had_reminder {
                ctx.scheduler.disarm(ctx.user_id, name).await;
            }
            i18n::habit_removed(ctx.lang, name, had_reminder)
        }
        Ok(RemoveOutcome::NotFound) => i18n::habit_not_found(ctx.lang, name),
        Err(e) => storage_failed(ctx, e),
    }
}

pub(super) async fn handle_mark(ctx: &CommandContext<'_>, name: &str) -> String {
    match ctx.ledger.mark_done(ctx.user_id, name).await {
        Ok(outcome) if outcome.already_done => {
            i18n::already_done(ctx.lang, name, outcome.streak)
        }
        Ok(outcome) => i18n::marked_done(ctx.lang, name, outcome.streak, outcome.created),
        Err(e) => storage_failed(ctx, e),
    }
}

pub(super) async fn handle_implicit(ctx: &CommandContext<'_>, name: &str) -> String {
    match ctx.ledger.has_habit(ctx.user_id, name).await {
        Ok(true) => {
            debug!("implicit text from {} marks '{name}'", ctx.user_id);
            handle_mark(ctx, name).await
        }
        Ok(false) => match ctx.ledger.add_habit(ctx.user_id, name).await {
            Ok(AddOutcome::Created) => i18n::habit_added(ctx.lang, name),
            // Lost a race with another message adding the same habit.
            Ok(AddOutcome::AlreadyExists) => i18n::habit_exists(ctx.lang, name),
            Err(e) => storage_failed(ctx, e),
        },
        Err(e) => storage_failed(ctx, e),
    }
}
