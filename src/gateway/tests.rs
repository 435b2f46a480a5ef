use super::*;
use crate::i18n;
use std::sync::atomic::{AtomicU64, Ordering};
use streak_memory::store::JsonFileBackend;
use streak_memory::Store;

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Channel that records everything sent through it.
#[derive(Default)]
struct MockChannel {
    sent: std::sync::Mutex<Vec<OutgoingMessage>>,
}

impl MockChannel {
    fn sent(&self) -> Vec<(i64, String)> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|m| (m.chat_id, m.text.clone()))
            .collect()
    }
}

#[async_trait]
impl Channel for MockChannel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, StreakError> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), StreakError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn stop(&self) -> Result<(), StreakError> {
        Ok(())
    }
}

fn gateway(channel: Arc<MockChannel>) -> (Arc<Gateway>, std::path::PathBuf) {
    let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir =
        std::env::temp_dir().join(format!("__streak_gw_test_{}_{}__", std::process::id(), id));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let backend = JsonFileBackend::new(dir.join("data.json")).unwrap();
    let ledger = Ledger::new(
        Store::with_backend(Arc::new(backend)),
        chrono_tz::Europe::Moscow,
    );
    let notifier = Arc::new(ChannelNotifier::new(channel.clone()));
    let scheduler = Arc::new(ReminderScheduler::new(ledger.clone(), notifier, "English"));
    let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();
    channels.insert("mock".into(), channel);
    (
        Arc::new(Gateway::new(channels, ledger, scheduler, "English")),
        dir,
    )
}

#[tokio::test]
async fn test_channel_notifier_sends_to_user_chat() {
    let channel = Arc::new(MockChannel::default());
    let notifier = ChannelNotifier::new(channel.clone());
    notifier.deliver(777, "time to stretch").await.unwrap();
    assert_eq!(channel.sent(), vec![(777, "time to stretch".to_string())]);
}

#[tokio::test]
async fn test_message_is_answered_on_its_channel() {
    let channel = Arc::new(MockChannel::default());
    let (gw, dir) = gateway(channel.clone());

    gw.handle_message(IncomingMessage::new("mock", 12345, "zaryadka"))
        .await;
    gw.handle_message(IncomingMessage::new("mock", 12345, "zaryadka"))
        .await;

    assert_eq!(
        channel.sent(),
        vec![
            (12345, i18n::habit_added("English", "zaryadka")),
            (12345, i18n::marked_done("English", "zaryadka", 1, false)),
        ]
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_blank_message_gets_no_reply() {
    let channel = Arc::new(MockChannel::default());
    let (gw, dir) = gateway(channel.clone());
    gw.handle_message(IncomingMessage::new("mock", 1, "   "))
        .await;
    assert!(channel.sent().is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_queued_messages_keep_order() {
    let channel = Arc::new(MockChannel::default());
    let (gw, dir) = gateway(channel.clone());

    let texts = ["read", "read", "list"];
    let mut handles = Vec::new();
    for text in texts {
        let gw = gw.clone();
        handles.push(tokio::spawn(async move {
            gw.dispatch_message(IncomingMessage::new("mock", 5, text))
                .await;
        }));
        // Let each dispatch register before the next one arrives.
        tokio::task::yield_now().await;
    }
    for h in handles {
        h.await.unwrap();
    }

    let replies: Vec<String> = channel.sent().into_iter().map(|(_, t)| t).collect();
    assert_eq!(replies.len(), 3);
    assert_eq!(replies[0], i18n::habit_added("English", "read"));
    assert_eq!(replies[1], i18n::marked_done("English", "read", 1, false));
    assert!(replies[2].contains("• read"));
    assert!(gw.active_senders.lock().await.is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}
