//! Text command router: turns a message into one habit or reminder operation
//! and returns the reply text.
//!
//! There are no required slash commands. Keywords work in Russian and
//! English; any other text is treated as a habit name.

mod habits;
mod reminders;


use crate::i18n;
use crate::scheduler::ReminderScheduler;
use streak_core::{error::StreakError, habit::normalize_name};
use streak_memory::Ledger;
use tracing::error;

/// Everything a command needs to run for one user.
pub struct CommandContext<'a> {
    pub ledger: &'a Ledger,
    pub scheduler: &'a ReminderScheduler,
    pub user_id: i64,
    pub lang: &'a str,
}

/// A keyword that arrived without its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageKind {
    Remove,
    Done,
    Remind,
    Unremind,
}

/// What a message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Help,
    List,
    Stats,
    ListReminders,
    Remove(String),
    MarkDone(String),
    Schedule { habit: String, time: String },
    Unschedule(String),
    Usage(UsageKind),
    /// Plain text: mark done if the habit exists, otherwise add it.
    Implicit(String),
}

const LIST_WORDS: &[&str] = &["список", "лист", "list"];
const STATS_WORDS: &[&str] = &["стат", "статы", "статистика", "stats"];
const REMINDERS_WORDS: &[&str] = &["напоминания", "reminders"];
const REMOVE_WORDS: &[&str] = &["удалить", "remove"];
const DONE_WORDS: &[&str] = &["сделал", "готово", "done"];
const REMIND_WORDS: &[&str] = &["напомни", "remind"];
const UNREMIND_WORDS: &[&str] = &["не напоминай", "unremind"];

impl Intent {
    /// Parse a message. Returns `None` for blank text.
    pub fn parse(text: &str) -> Option<Self> {
        let text = normalize_name(text);
        if text.is_empty() {
            return None;
        }

        if text.starts_with('/') {
            return Some(Self::parse_slash(&text));
        }

        if LIST_WORDS.contains(&text.as_str()) {
            return Some(Self::List);
        }
        if STATS_WORDS.contains(&text.as_str()) {
            return Some(Self::Stats);
        }
        if REMINDERS_WORDS.contains(&text.as_str()) {
            return Some(Self::ListReminders);
        }

        if let Some(arg) = keyword_arg(&text, UNREMIND_WORDS) {
            return Some(match arg {
                "" => Self::Usage(UsageKind::Unremind),
                name => Self::Unschedule(name.to_string()),
            });
        }
        if let Some(arg) = keyword_arg(&text, REMIND_WORDS) {
            // Last token is the time, everything before it the habit.
            return Some(match arg.rsplit_once(' ') {
                Some((habit, time)) => Self::Schedule {
                    habit: habit.to_string(),
                    time: time.to_string(),
                },
                None => Self::Usage(UsageKind::Remind),
            });
        }
        if let Some(arg) = keyword_arg(&text, REMOVE_WORDS) {
            return Some(match arg {
                "" => Self::Usage(UsageKind::Remove),
                name => Self::Remove(name.to_string()),
            });
        }
        if let Some(arg) = keyword_arg(&text, DONE_WORDS) {
            return Some(match arg {
                "" => Self::Usage(UsageKind::Done),
                name => Self::MarkDone(name.to_string()),
            });
        }

        Some(Self::Implicit(text))
    }

    fn parse_slash(text: &str) -> Self {
        let first = text.split(' ').next().unwrap_or(text);
        // Strip @botname suffix (e.g. "/help@streak_bot" -> "/help").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/list" => Self::List,
            "/stats" => Self::Stats,
            "/reminders" => Self::ListReminders,
            _ => Self::Help,
        }
    }
}

/// If `text` is one of `keywords`, alone or followed by a space, return the
/// rest (possibly empty).
fn keyword_arg<'t>(text: &'t str, keywords: &[&str]) -> Option<&'t str> {
    keywords.iter().find_map(|kw| {
        let rest = text.strip_prefix(kw)?;
        if rest.is_empty() {
            Some("")
        } else {
            rest.strip_prefix(' ')
        }
    })
}

/// Run the intent and return the reply text.
pub async fn handle(intent: Intent, ctx: &CommandContext<'_>) -> String {
    let lang = ctx.lang;
    match intent {
        Intent::Help => i18n::t("help", lang).to_string(),
        Intent::List => habits::handle_list(ctx).await,
        Intent::Stats => habits::handle_stats(ctx).await,
        Intent::Remove(name) => habits::handle_remove(ctx, &name).await,
        Intent::MarkDone(name) => habits::handle_mark(ctx, &name).await,
        Intent::Implicit(name) => habits::handle_implicit(ctx, &name).await,
        Intent::ListReminders => reminders::handle_list(ctx).await,
        Intent::Schedule { habit, time } => reminders::handle_schedule(ctx, &habit, &time).await,
        Intent::Unschedule(name) => reminders::handle_unschedule(ctx, &name).await,
        Intent::Usage(kind) => {
            let key = match kind {
                UsageKind::Remove => "usage_remove",
                UsageKind::Done => "usage_done",
                UsageKind::Remind => "usage_remind",
                UsageKind::Unremind => "usage_unremind",
            };
            i18n::t(key, lang).to_string()
        }
    }
}

/// Log a store failure and produce the user-facing reply for it.
fn storage_failed(ctx: &CommandContext<'_>, e: StreakError) -> String {
    error!("command for user {} failed: {e}", ctx.user_id);
    i18n::t("storage_error", ctx.lang).to_string()
}
