//! Format helpers for strings with interpolation.

use super::t;
use streak_core::habit::ReminderTime;
use streak_memory::ledger::{analytics::WINDOW_DAYS, HabitSummary, WeeklyStats};

pub fn habit_added(lang: &str, name: &str) -> String {
    match lang {
        "Russian" => format!("Добавил привычку: «{name}» ✅"),
        _ => format!("Added habit: «{name}» ✅"),
    }
}

pub fn habit_exists(lang: &str, name: &str) -> String {
    match lang {
        "Russian" => format!("Привычка уже есть: «{name}»"),
        _ => format!("You already track «{name}»"),
    }
}

pub fn habit_removed(lang: &str, name: &str, had_reminder: bool) -> String {
    let base = match lang {
        "Russian" => format!("Удалил привычку: «{name}» 🗑️"),
        _ => format!("Removed habit: «{name}» 🗑️"),
    };
    if !had_reminder {
        return base;
    }
    match lang {
        "Russian" => format!("{base}\nНапоминание тоже выключено."),
        _ => format!("{base}\nIts reminder is off too."),
    }
}

pub fn habit_not_found(lang: &str, name: &str) -> String {
    match lang {
        "Russian" => format!("Нет такой привычки: «{name}»"),
        _ => format!("No such habit: «{name}»"),
    }
}

/// Reply to a completion. `created` means the habit was added by this mark.
pub fn marked_done(lang: &str, name: &str, streak: u32, created: bool) -> String {
    let head = match (lang, created) {
        ("Russian", true) => format!("Добавил и отметил выполненной сегодня: «{name}» 🔥"),
        ("Russian", false) => format!("Отметил выполненной сегодня: «{name}» 🔥"),
        (_, true) => format!("Added and marked done today: «{name}» 🔥"),
        (_, false) => format!("Marked done today: «{name}» 🔥"),
    };
    format!("{head}\n{}", streak_line(lang, streak))
}

pub fn already_done(lang: &str, name: &str, streak: u32) -> String {
    let head = match lang {
        "Russian" => format!("Уже отмечено сегодня: «{name}» ✅"),
        _ => format!("Already marked today: «{name}» ✅"),
    };
    format!("{head}\n{}", streak_line(lang, streak))
}

fn streak_line(lang: &str, streak: u32) -> String {
    match lang {
        "Russian" => format!("Серия: {streak} {}", days_ru(streak)),
        _ if streak == 1 => "Streak: 1 day".to_string(),
        _ => format!("Streak: {streak} days"),
    }
}

/// Russian plural for "day".
fn days_ru(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (1, r) if r != 11 => "день",
        (2..=4, r) if !(12..=14).contains(&r) => "дня",
        _ => "дней",
    }
}

pub fn habit_list(lang: &str, habits: &[HabitSummary]) -> String {
    if habits.is_empty() {
        return t("no_habits", lang).to_string();
    }
    let done = t("done_count", lang);
    let streak = t("streak", lang);
    let mut lines = vec![t("list_header", lang).to_string()];
    for h in habits {
        let mut line = format!("• {} — {done}: {}, {streak}: {}", h.name, h.total_done, h.streak);
        if let Some(time) = h.reminder {
            line.push_str(&format!(" ⏰ {time}"));
        }
        lines.push(line);
    }
    lines.push(String::new());
    lines.push(t("list_footer", lang).to_string());
    lines.join("\n")
}

pub fn weekly_stats(lang: &str, stats: &WeeklyStats) -> String {
    if stats.habits.is_empty() {
        return t("no_habits_stats", lang).to_string();
    }
    let header = match lang {
        "Russian" => format!(
            "📊 Статистика за {WINDOW_DAYS} дней ({} — {}):",
            stats.start, stats.end
        ),
        _ => format!(
            "📊 Stats for the last {WINDOW_DAYS} days ({} — {}):",
            stats.start, stats.end
        ),
    };
    let mut lines = vec![header];
    for h in &stats.habits {
        lines.push(format!("• {}: {}/{WINDOW_DAYS}", h.name, h.done_in_window));
    }
    lines.push(String::new());
    lines.push(t("stats_footer", lang).to_string());
    lines.join("\n")
}

pub fn reminder_set(lang: &str, name: &str, time: ReminderTime) -> String {
    match lang {
        "Russian" => format!("Буду напоминать про «{name}» каждый день в {time} ⏰"),
        _ => format!("I'll remind you about «{name}» every day at {time} ⏰"),
    }
}

pub fn reminder_moved(lang: &str, name: &str, from: ReminderTime, to: ReminderTime) -> String {
    match lang {
        "Russian" => format!("Перенёс напоминание про «{name}»: {from} → {to} ⏰"),
        _ => format!("Moved the reminder for «{name}»: {from} → {to} ⏰"),
    }
}

pub fn invalid_time(lang: &str, raw: &str) -> String {
    match lang {
        "Russian" => format!("Не понял время «{raw}». Нужно ЧЧ:ММ, например 08:30"),
        _ => format!("Can't read the time «{raw}». Use HH:MM, for example 08:30"),
    }
}

pub fn reminder_cleared(lang: &str, name: &str) -> String {
    match lang {
        "Russian" => format!("Больше не напоминаю про «{name}»"),
        _ => format!("No more reminders for «{name}»"),
    }
}

pub fn reminder_not_set(lang: &str, name: &str) -> String {
    match lang {
        "Russian" => format!("Для «{name}» нет напоминания"),
        _ => format!("There is no reminder for «{name}»"),
    }
}

pub fn reminder_list(lang: &str, reminders: &[(String, ReminderTime)]) -> String {
    if reminders.is_empty() {
        return t("no_reminders", lang).to_string();
    }
    let mut lines = vec![t("reminders_header", lang).to_string()];
    for (name, time) in reminders {
        lines.push(format!("• {time} — {name}"));
    }
    lines.join("\n")
}

/// Text delivered when a reminder fires.
pub fn reminder_text(lang: &str, name: &str) -> String {
    let head = match lang {
        "Russian" => format!("⏰ Напоминание: пора заняться «{name}»"),
        _ => format!("⏰ Reminder: time for «{name}»"),
    };
    format!("{head}\n{}", t("reminder_hint", lang))
}
