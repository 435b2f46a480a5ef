//! Internationalization: localized strings for bot replies.
//!
//! `t(key, lang)` returns static strings; the helpers in `format` build
//! strings with interpolation. Supported languages: English (fallback) and
//! Russian.

mod format;

#[cfg(test)]
mod tests;

pub use format::*;

/// Return a localized static string for `key` in the given `lang`.
/// Falls back to English for unsupported languages, and to `"???"` for
/// unknown keys.
pub fn t(key: &str, lang: &str) -> &'static str {
    if lang == "Russian" {
        if let Some(v) = russian(key) {
            return v;
        }
    }
    english(key).unwrap_or("???")
}

fn english(key: &str) -> Option<&'static str> {
    Some(match key {
        "help" => {
            "Hi! I'm StreakBuddy.\n\n\
             How it works (no commands needed):\n\
             1) Send a habit as text: \"stretch 20min\" and I'll add it\n\
             2) Send the same habit again and I'll mark it done today\n\n\
             Useful words:\n\
             \u{2022} \"list\": show your habits\n\
             \u{2022} \"stats\": progress over the last 7 days\n\
             \u{2022} \"remove <habit>\": delete a habit\n\
             \u{2022} \"done <habit>\": mark a habit done explicitly\n\
             \u{2022} \"remind <habit> HH:MM\": daily reminder\n\
             \u{2022} \"unremind <habit>\": stop the reminder\n\
             \u{2022} \"reminders\": list your reminders"
        }
        "no_habits" => "No habits yet. Just send a habit name as text (for example: \"stretch 20min\").",
        "no_habits_stats" => "No habits yet. Add one by sending its name (for example: \"read 20 minutes\").",
        "list_header" => "📋 Your habits:",
        "list_footer" => "To mark a habit done, just send its name again.",
        "stats_footer" => "Tip: send a habit name to mark it done.",
        "done_count" => "done",
        "streak" => "streak",
        "reminders_header" => "⏰ Your reminders:",
        "no_reminders" => "No reminders. Set one with: remind <habit> HH:MM",
        "usage_remove" => "Write it like this: remove <habit name>",
        "usage_done" => "Write it like this: done <habit name>",
        "usage_remind" => "Write it like this: remind <habit name> HH:MM",
        "usage_unremind" => "Write it like this: unremind <habit name>",
        "storage_error" => "Could not save that right now. Please try again.",
        "reminder_hint" => "Send the habit name when you're done.",
        _ => return None,
    })
}

fn russian(key: &str) -> Option<&'static str> {
    Some(match key {
        "help" => {
            "Привет! Я StreakBuddy 😊\n\n\
             Как пользоваться (без команд):\n\
             1) Напиши привычку текстом: «зарядка 20мин» → я добавлю\n\
             2) Напиши эту же привычку ещё раз → отмечу выполненной сегодня ✅\n\n\
             Полезные слова:\n\
             \u{2022} «список» — покажу привычки\n\
             \u{2022} «стат» или «статистика» — покажу прогресс\n\
             \u{2022} «удалить <привычка>» — удалю\n\
             \u{2022} «сделал <привычка>» — отметить явно\n\
             \u{2022} «напомни <привычка> ЧЧ:ММ» — ежедневное напоминание\n\
             \u{2022} «не напоминай <привычка>» — выключить напоминание\n\
             \u{2022} «напоминания» — список напоминаний"
        }
        "no_habits" => "Пока нет привычек. Просто напиши название привычки текстом (например: «зарядка 20мин»).",
        "no_habits_stats" => "Пока нет привычек. Добавь — просто напиши текстом (например: «читать 20 минут»).",
        "list_header" => "📋 Твои привычки:",
        "list_footer" => "Чтобы отметить выполнение: просто напиши название привычки ещё раз ✅",
        "stats_footer" => "Подсказка: чтобы отметить выполнение — просто напиши привычку текстом.",
        "done_count" => "выполнено",
        "streak" => "серия",
        "reminders_header" => "⏰ Твои напоминания:",
        "no_reminders" => "Напоминаний нет. Добавь так: напомни <привычка> ЧЧ:ММ",
        "usage_remove" => "Напиши так: удалить <название привычки>",
        "usage_done" => "Напиши так: сделал <название привычки>",
        "usage_remind" => "Напиши так: напомни <название привычки> ЧЧ:ММ",
        "usage_unremind" => "Напиши так: не напоминай <название привычки>",
        "storage_error" => "Не получилось сохранить. Попробуй ещё раз.",
        "reminder_hint" => "Когда сделаешь — напиши название привычки.",
        _ => return None,
    })
}
