//! Gateway: the main event loop connecting channels, the command router and
//! the reminder scheduler.

#[cfg(test)]
mod tests;

use crate::commands::{self, CommandContext, Intent};
use crate::scheduler::ReminderScheduler;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use streak_core::{
    error::StreakError,
    message::{IncomingMessage, OutgoingMessage},
    traits::{Channel, Notifier},
};
use streak_memory::Ledger;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

/// Delivers reminder texts through a channel. On Telegram the user id is
/// the private chat id.
pub struct ChannelNotifier {
    channel: Arc<dyn Channel>,
}

impl ChannelNotifier {
    pub fn new(channel: Arc<dyn Channel>) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn deliver(&self, user_id: i64, text: &str) -> Result<(), StreakError> {
        self.channel
            .send(OutgoingMessage {
                text: text.to_string(),
                chat_id: user_id,
            })
            .await
    }
}

/// The central gateway that routes messages between channels and the ledger.
pub struct Gateway {
    channels: HashMap<String, Arc<dyn Channel>>,
    ledger: Ledger,
    scheduler: Arc<ReminderScheduler>,
    language: String,
    /// Users with a message in flight. Later messages queue here so one
    /// user's replies keep their order.
    active_senders: Mutex<HashMap<i64, Vec<IncomingMessage>>>,
}

impl Gateway {
    pub fn new(
        channels: HashMap<String, Arc<dyn Channel>>,
        ledger: Ledger,
        scheduler: Arc<ReminderScheduler>,
        language: &str,
    ) -> Self {
        Self {
            channels,
            ledger,
            scheduler,
            language: language.to_string(),
            active_senders: Mutex::new(HashMap::new()),
        }
    }

    /// Run the main event loop until Ctrl-C.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        // Reminders are armed before the first message is read.
        let restored = self.scheduler.restore_all().await?;

        info!(
            "StreakBuddy gateway running | store: {} | channels: {} | reminders: {restored} | tz: {}",
            self.ledger.store().backend_name(),
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
            self.ledger.timezone(),
        );

        let (tx, mut rx) = mpsc::channel::<IncomingMessage>(256);

        for (name, channel) in &self.channels {
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(msg) = channel_rx.recv().await {
                    if tx.send(msg).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("Channel started: {name}");
        }

        drop(tx);

        loop {
            tokio::select! {
                maybe = rx.recv() => {
                    let Some(incoming) = maybe else {
                        warn!("all channels closed");
                        break;
                    };
                    let gw = self.clone();
                    tokio::spawn(async move {
                        gw.dispatch_message(incoming).await;
                    });
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Dispatch a message: queue it if the sender is busy, otherwise process.
    async fn dispatch_message(self: Arc<Self>, incoming: IncomingMessage) {
        let sender = incoming.chat_id;

        {
            let mut active = self.active_senders.lock().await;
            if let Some(queue) = active.get_mut(&sender) {
                debug!("queued message from {sender} (one in progress)");
                queue.push(incoming);
                return;
            }
            active.insert(sender, Vec::new());
        }

        self.handle_message(incoming).await;

        // Drain anything that arrived meanwhile.
        loop {
            let next = {
                let mut active = self.active_senders.lock().await;
                match active.get_mut(&sender) {
                    Some(queue) if !queue.is_empty() => Some(queue.remove(0)),
                    _ => {
                        active.remove(&sender);
                        None
                    }
                }
            };

            match next {
                Some(queued) => self.handle_message(queued).await,
                None => break,
            }
        }
    }

    /// Route one message and send the reply back where it came from.
    pub(crate) async fn handle_message(&self, incoming: IncomingMessage) {
        let Some(intent) = Intent::parse(&incoming.text) else {
            return;
        };
        debug!("{} from {}: {intent:?}", incoming.channel, incoming.chat_id);

        let ctx = CommandContext {
            ledger: &self.ledger,
            scheduler: &self.scheduler,
            user_id: incoming.chat_id,
            lang: &self.language,
        };
        let reply = commands::handle(intent, &ctx).await;
        self.send_text(&incoming, &reply).await;
    }

    /// Stop timers, then channels.
    async fn shutdown(&self) {
        info!(
            "Shutting down... ({} reminder timer(s) live)",
            self.scheduler.armed().await.len()
        );

        self.scheduler.shutdown().await;

        for (name, channel) in &self.channels {
            if let Err(e) = channel.stop().await {
                warn!("failed to stop channel {name}: {e}");
            }
        }

        info!("Shutdown complete.");
    }

    /// Send a plain text message back to the sender.
    async fn send_text(&self, incoming: &IncomingMessage, text: &str) {
        let msg = OutgoingMessage {
            text: text.to_string(),
            chat_id: incoming.chat_id,
        };

        if let Some(channel) = self.channels.get(&incoming.channel) {
            if let Err(e) = channel.send(msg).await {
                error!("failed to send message: {e}");
            }
        }
    }
}
