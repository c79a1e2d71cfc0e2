//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here.

use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use study_me_bot::adapters::messaging::{ConsoleMessenger, LineAdapter};
use study_me_bot::adapters::persistence::SqliteRepo;
use study_me_bot::adapters::ui::tui::TuiInputPort;
use study_me_bot::domain::MessageParser;
use study_me_bot::ports::{GoalRepo, InputPort, MessengerPort, NotificationRepo, StudyLogRepo};
use study_me_bot::shared::clock::LocalClock;
use study_me_bot::shared::config::AppConfig;
use study_me_bot::usecases::{
    GoalReportService, MessageService, ProgressService, ReminderService, Schedule,
    SchedulerService,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    study_me_bot::adapters::ui::init_ui();

    let cfg = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "config load failed; using defaults");
            AppConfig::default()
        }
    };

    let data_path = PathBuf::from(cfg.data_dir_or_default());
    tokio::fs::create_dir_all(&data_path)
        .await
        .map_err(|e| anyhow::anyhow!("create data dir: {}", e))?;
    let data_dir_abs = data_path
        .canonicalize()
        .unwrap_or_else(|_| data_path.clone());
    info!(path = %data_dir_abs.display(), "data directory");

    let clock = LocalClock::new(cfg.local_offset());
    info!(offset = %clock.offset(), "local time offset");

    // --- Store: one SQLite database behind all three repo ports ---
    let sqlite_repo = Arc::new(
        SqliteRepo::connect(&data_path)
            .await
            .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
    );
    info!(db = %sqlite_repo.db_path().display(), "store ready");
    let logs: Arc<dyn StudyLogRepo> = Arc::clone(&sqlite_repo) as Arc<dyn StudyLogRepo>;
    let goals: Arc<dyn GoalRepo> = Arc::clone(&sqlite_repo) as Arc<dyn GoalRepo>;
    let notifications: Arc<dyn NotificationRepo> =
        Arc::clone(&sqlite_repo) as Arc<dyn NotificationRepo>;

    // --- Messenger ---
    let messenger: Arc<dyn MessengerPort> = if cfg.is_line_configured() {
        info!(url = %cfg.line_api_url_or_default(), "LINE push enabled");
        Arc::new(LineAdapter::new(
            cfg.line_api_url_or_default(),
            cfg.line_channel_access_token.clone().unwrap_or_default(),
        ))
    } else {
        warn!("LINE_CHANNEL_ACCESS_TOKEN not set, pushes go to the console log");
        Arc::new(ConsoleMessenger::new())
    };

    // --- Parser ---
    let parser_cfg = cfg.parser_config();
    info!(subjects = parser_cfg.subjects.len(), "subject vocabulary loaded");
    let parser = Arc::new(MessageParser::new(parser_cfg));

    // --- Services ---
    let message_service = Arc::new(MessageService::new(
        parser,
        Arc::clone(&logs),
        Arc::clone(&goals),
        Arc::clone(&notifications),
        clock,
    ));
    let goal_reports = Arc::new(GoalReportService::new(
        Arc::clone(&logs),
        Arc::clone(&goals),
        Arc::clone(&messenger),
    ));
    let progress = Arc::new(ProgressService::new(
        Arc::clone(&logs),
        Arc::clone(&messenger),
        data_path.join("exports"),
    ));
    let reminders = Arc::new(ReminderService::new(
        Arc::clone(&notifications),
        Arc::clone(&logs),
        Arc::clone(&goals),
        Arc::clone(&messenger),
    ));
    let schedule = Schedule {
        goal_report_at: cfg.goal_report_time_or_default(),
        progress_report_at: cfg.progress_report_time_or_default(),
    };
    let tick_secs = cfg.scheduler_tick_secs_or_default();
    let scheduler = Arc::new(SchedulerService::new(
        Arc::clone(&reminders),
        Arc::clone(&goal_reports),
        Arc::clone(&progress),
        clock,
        schedule,
        Duration::from_secs(tick_secs),
    ));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        message_service,
        goal_reports,
        progress,
        reminders,
        scheduler,
        clock,
    ));

    // --- Run (main menu) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
