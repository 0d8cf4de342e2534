use dotenvy::dotenv;
use habit_buddy::{
    config::{database, settings, telegram::TelegramConfig},
    core::{periodicity::seed_periodicities, reminder::ReminderJob},
    errors::Result,
    notify::TelegramSender,
};
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();

    // 3. Load settings
    let app_config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let utc_offset = app_config.reminder.utc_offset()?;

    // 4. Initialize database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed periodicities from config.toml
    seed_periodicities(&db, &app_config.periodicities).await?;

    // 6. Telegram sender, token loaded right before use
    let telegram = TelegramConfig::from_env()
        .inspect_err(|e| error!("TELEGRAM_BOT_TOKEN not usable: {}", e))?;
    let sender = TelegramSender::new(&telegram)?;

    // 7. Run the reminder loop until Ctrl-C. Ticks missed by a slow scan are
    // dropped, so two scans never run at once.
    let job = ReminderJob::new(db, sender, utc_offset);
    let mut interval = time::interval(Duration::from_secs(app_config.reminder.interval_secs.max(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Reminder scheduler started (every {}s, UTC offset {})",
        app_config.reminder.interval_secs, utc_offset
    );

    loop {
        tokio::select! {
            _ = interval.tick() => job.check_habits_and_send_reminders().await,
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Shutting down reminder scheduler");
                break;
            }
        }
    }

    Ok(())
}
