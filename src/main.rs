mod commands;
mod gateway;
mod i18n;
mod scheduler;

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use streak_channels::telegram::TelegramChannel;
use streak_core::{
    config::{self, shellexpand, Config},
    traits::Channel,
};
use streak_memory::{Ledger, Store};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "streakbuddy",
    version,
    about = "StreakBuddy: habit streaks and daily reminders over Telegram"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Show configuration and store contents.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _log_guard = init_tracing(&cfg)?;

    match cli.command {
        Commands::Start => start(cfg).await?,
        Commands::Status => status(&cli.config, &cfg).await?,
    }

    Ok(())
}

/// Console logging, plus a daily-rolling file when `bot.log_to_file` is set.
/// The returned guard flushes the file writer on drop.
fn init_tracing(cfg: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.bot.log_level));

    let (file_layer, guard) = if cfg.bot.log_to_file {
        let dir = PathBuf::from(shellexpand(&cfg.bot.data_dir)).join("logs");
        std::fs::create_dir_all(&dir)?;
        let appender = tracing_appender::rolling::daily(&dir, "streakbuddy.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn start(cfg: Config) -> anyhow::Result<()> {
    let tz = cfg.bot.tz()?;

    // Build channels.
    let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();

    if let Some(ref tg) = cfg.channel.telegram {
        if tg.enabled {
            if tg.bot_token.is_empty() {
                anyhow::bail!(
                    "Telegram is enabled but bot_token is empty. \
                     Set it in config.toml or the {} env var.",
                    config::TELEGRAM_TOKEN_ENV
                );
            }
            channels.insert(
                "telegram".to_string(),
                Arc::new(TelegramChannel::new(tg.clone())),
            );
        }
    }

    let Some(reminder_channel) = channels.get("telegram").cloned() else {
        anyhow::bail!("No channels enabled. Enable [channel.telegram] in config.toml.");
    };

    // Build store, ledger and scheduler.
    let store = Store::open(&cfg.store, &cfg.bot.data_dir).await?;
    let ledger = Ledger::new(store, tz);
    let notifier = Arc::new(gateway::ChannelNotifier::new(reminder_channel));
    let scheduler = Arc::new(scheduler::ReminderScheduler::new(
        ledger.clone(),
        notifier,
        &cfg.bot.language,
    ));

    info!("{} starting (language: {})", cfg.bot.name, cfg.bot.language);
    let gw = Arc::new(gateway::Gateway::new(
        channels,
        ledger,
        scheduler,
        &cfg.bot.language,
    ));
    gw.run().await
}

async fn status(config_path: &str, cfg: &Config) -> anyhow::Result<()> {
    println!("{} status\n", cfg.bot.name);
    println!("Config:    {config_path}");
    println!("Data dir:  {}", shellexpand(&cfg.bot.data_dir));
    println!("Timezone:  {}", cfg.bot.tz()?);
    println!("Language:  {}", cfg.bot.language);
    println!(
        "Store:     {} ({})",
        cfg.store.backend,
        cfg.store.resolved_path(&cfg.bot.data_dir)
    );

    let state = Store::open(&cfg.store, &cfg.bot.data_dir).await?.load().await?;
    let habits: usize = state.users.values().map(|u| u.habits.len()).sum();
    let reminders: usize = state.users.values().map(|u| u.reminders.len()).sum();
    println!(
        "Contents:  {} user(s), {habits} habit(s), {reminders} reminder(s)",
        state.users.len()
    );
    println!();

    match cfg.channel.telegram {
        Some(ref tg) => println!(
            "  telegram: {}",
            if tg.enabled && !tg.bot_token.is_empty() {
                "configured"
            } else if tg.enabled {
                "enabled but missing bot_token"
            } else {
                "disabled"
            }
        ),
        None => println!("  telegram: not configured"),
    }

    Ok(())
}
