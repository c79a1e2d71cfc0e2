//! Implements InputPort. Inquire-based main menu.
//!
//! The chat simulator stands in for the LINE webhook: each line typed is handled as an inbound message.

use crate::domain::{DomainError, InboundMessage};
use crate::ports::InputPort;
use crate::shared::clock::{clock_time_of, LocalClock};
use crate::usecases::{
    BatchStats, GoalReportService, MessageService, ProgressService, ReminderService,
    SchedulerService,
};
use async_trait::async_trait;
use chrono::Timelike;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{Select, Text};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_SIM_USER: &str = "U-local";

/// Sets the global inquire look (pink prompt prefix, blue highlight).
pub fn apply_theme() {
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("✎").with_fg(Color::LightMagenta))
        .with_highlighted_option_prefix(Styled::new("❯").with_fg(Color::LightCyan));
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Chat,
    GoalReports,
    Progress,
    Reminders,
    Greeting,
    Export,
    Scheduler,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 8] = [
        Self::Chat,
        Self::GoalReports,
        Self::Progress,
        Self::Reminders,
        Self::Greeting,
        Self::Export,
        Self::Scheduler,
        Self::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Chat => "💬 Chat simulator",
            Self::GoalReports => "📊 Send today's goal reports",
            Self::Progress => "📈 Send progress summaries",
            Self::Reminders => "⏰ Send reminders due now",
            Self::Greeting => "👋 Broadcast greeting",
            Self::Export => "📁 Export study log CSV",
            Self::Scheduler => "🕒 Run scheduler",
            Self::Exit => "🚪 Exit",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.label() == label)
    }
}

/// Returns Ok(None) when the user cancelled the prompt (Esc / Ctrl-C).
fn cancelled_as_none<T>(r: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match r {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Ui(e.to_string())),
    }
}

/// Runs `fut` behind a spinner and prints the delivery counts.
async fn with_spinner<F>(message: &'static str, fut: F) -> Result<BatchStats, DomainError>
where
    F: Future<Output = Result<BatchStats, DomainError>>,
{
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.magenta} {msg} [{elapsed}]") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    let result = fut.await;
    match &result {
        Ok(stats) => pb.finish_with_message(format!(
            "{message}: sent {}, failed {}",
            stats.sent, stats.failed
        )),
        Err(e) => pb.abandon_with_message(format!("{message}: {e}")),
    }
    result
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    messages: Arc<MessageService>,
    goal_reports: Arc<GoalReportService>,
    progress: Arc<ProgressService>,
    reminders: Arc<ReminderService>,
    scheduler: Arc<SchedulerService>,
    clock: LocalClock,
}

impl TuiInputPort {
    pub fn new(
        messages: Arc<MessageService>,
        goal_reports: Arc<GoalReportService>,
        progress: Arc<ProgressService>,
        reminders: Arc<ReminderService>,
        scheduler: Arc<SchedulerService>,
        clock: LocalClock,
    ) -> Self {
        Self {
            messages,
            goal_reports,
            progress,
            reminders,
            scheduler,
            clock,
        }
    }

    async fn run_chat(&self) -> Result<(), DomainError> {
        let Some(user_id) = cancelled_as_none(
            Text::new("LINE user id:")
                .with_default(DEFAULT_SIM_USER)
                .prompt(),
        )?
        else {
            return Ok(());
        };
        println!("Type a message (empty line to return). e.g. 英語30分 / 毎日1時間半 / 朝の通知を7時にして");
        loop {
            let Some(text) = cancelled_as_none(Text::new("›").prompt())? else {
                return Ok(());
            };
            if text.trim().is_empty() {
                return Ok(());
            }
            let handled = self
                .messages
                .handle_message(&InboundMessage::new(user_id.trim(), text))
                .await;
            println!("{}", handled.reply);
        }
    }

    async fn dispatch(&self, action: MenuAction) -> Result<(), DomainError> {
        let now = self.clock.now();
        let today = now.date_naive();
        match action {
            MenuAction::Chat => self.run_chat().await,
            MenuAction::GoalReports => {
                with_spinner("Goal reports", self.goal_reports.send_reports(today))
                    .await
                    .map(drop)
            }
            MenuAction::Progress => {
                with_spinner("Progress summaries", self.progress.send_reports(today))
                    .await
                    .map(drop)
            }
            MenuAction::Reminders => {
                with_spinner("Reminders", self.reminders.send_due(clock_time_of(&now)))
                    .await
                    .map(drop)
            }
            MenuAction::Greeting => {
                with_spinner("Greeting", self.reminders.broadcast_greeting(now.hour()))
                    .await
                    .map(drop)
            }
            MenuAction::Export => {
                let paths = self.progress.export_csv().await?;
                if paths.is_empty() {
                    println!("No study logs to export.");
                }
                for p in paths {
                    println!("Wrote {}", p.display());
                }
                Ok(())
            }
            MenuAction::Scheduler => {
                println!("Scheduler running. Press Ctrl-C to stop.");
                tokio::select! {
                    r = self.scheduler.run_loop() => r,
                    _ = tokio::signal::ctrl_c() => {
                        println!("Scheduler stopped.");
                        Ok(())
                    }
                }
            }
            MenuAction::Exit => Ok(()),
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        let options: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();
        loop {
            let picked = cancelled_as_none(Select::new("Main menu", options.clone()).prompt())?;
            let Some(action) = picked.and_then(MenuAction::from_label) else {
                return Ok(());
            };
            if action == MenuAction::Exit {
                return Ok(());
            }
            // a failed action is reported and the menu comes back
            if let Err(e) = self.dispatch(action).await {
                tracing::warn!(error = %e, action = action.label(), "menu action failed");
                println!("⚠️ {e}");
            }
        }
    }
}
