//! The slice of the Bot API this bot reads and writes.
//!
//! Only text messages in private chats matter, so most of the update schema
//! is left undeclared and skipped by serde.

use serde::{Deserialize, Serialize};

/// Envelope of every Bot API reply.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiReply<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

impl<T> ApiReply<T> {
    /// The result on success, Telegram's description otherwise.
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.ok {
            Ok(self.result)
        } else {
            Err(self.description.unwrap_or_else(|| "no description".into()))
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Update {
    pub update_id: i64,
    /// Absent for edits, callbacks and everything else we ignore.
    pub message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatMessage {
    pub from: Option<Sender>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Sender {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl Sender {
    /// `@username` when set, otherwise the full name.
    pub fn display_name(&self) -> String {
        match (&self.username, &self.last_name) {
            (Some(un), _) => format!("@{un}"),
            (None, Some(ln)) => format!("{} {ln}", self.first_name),
            (None, None) => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Chat {
    pub id: i64,
    #[serde(default, rename = "type")]
    pub kind: ChatKind,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Body of `sendMessage`.
#[derive(Debug, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
}

/// One entry of the `setMyCommands` menu.
#[derive(Debug, Serialize)]
pub(crate) struct BotCommand {
    pub command: &'static str,
    pub description: &'static str,
}

/// Menu shown by Telegram clients. Everything else works as plain words.
pub(crate) const COMMAND_MENU: &[BotCommand] = &[
    BotCommand {
        command: "help",
        description: "How to track habits",
    },
    BotCommand {
        command: "list",
        description: "Your habits and streaks",
    },
    BotCommand {
        command: "stats",
        description: "Completions over the last 7 days",
    },
    BotCommand {
        command: "reminders",
        description: "Your daily reminders",
    },
];
