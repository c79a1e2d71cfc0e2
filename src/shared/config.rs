//! Application configuration. Data paths, LINE credentials, subject vocabulary, schedule.
//!
//! Loaded once at startup and read-only afterwards.

use crate::adapters::messaging::DEFAULT_LINE_API_URL;
use crate::domain::{ClockTime, ParserConfig, PeriodLabels, SubjectVocabulary};
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

/// JST, the offset the bot's users live in.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub data_dir: Option<String>,

    /// LINE channel access token. Read from STUDY_ME_LINE_CHANNEL_ACCESS_TOKEN or LINE_CHANNEL_ACCESS_TOKEN.
    #[serde(default)]
    pub line_channel_access_token: Option<String>,

    /// LINE API base URL. Defaults to https://api.line.me.
    #[serde(default)]
    pub line_api_url: Option<String>,

    /// Local offset used for dates and schedules. Read from STUDY_ME_UTC_OFFSET_HOURS.
    #[serde(default)]
    pub utc_offset_hours: Option<i32>,

    /// Ordered subject vocabulary. Read from STUDY_ME_SUBJECTS (comma separated) or the config file.
    #[serde(default)]
    pub subjects: Option<Vec<String>>,

    // ─────────────────────────────────────────────────────────────────────────
    // Schedule
    // ─────────────────────────────────────────────────────────────────────────
    /// Local HH:MM at which daily goal reports are pushed (default 22:00).
    #[serde(default)]
    pub goal_report_time: Option<String>,

    /// Local HH:MM at which progress summaries are pushed (default 21:00).
    #[serde(default)]
    pub progress_report_time: Option<String>,

    /// Scheduler tick in seconds (default 60).
    #[serde(default)]
    pub scheduler_tick_secs: Option<u64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(
            config::Environment::with_prefix("STUDY_ME")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("subjects"),
        );
        if let Ok(path) = std::env::var("STUDY_ME_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // LINE_CHANNEL_ACCESS_TOKEN is read directly (no prefix) so existing .env files keep working
        if cfg.line_channel_access_token.is_none() {
            cfg.line_channel_access_token = std::env::var("LINE_CHANNEL_ACCESS_TOKEN").ok();
        }
        // STUDY_ME_SUBJECTS also accepts the Japanese comma
        if let Ok(s) = std::env::var("STUDY_ME_SUBJECTS") {
            cfg.subjects = Some(parse_subject_list(&s));
        }
        if let Ok(s) = std::env::var("STUDY_ME_UTC_OFFSET_HOURS") {
            if let Ok(h) = s.parse::<i32>() {
                cfg.utc_offset_hours = Some(h);
            }
        }
        if let Ok(s) = std::env::var("STUDY_ME_SCHEDULER_TICK_SECS") {
            if let Ok(n) = s.parse::<u64>() {
                cfg.scheduler_tick_secs = Some(n);
            }
        }
        Ok(cfg)
    }

    pub fn data_dir_or_default(&self) -> String {
        self.data_dir.clone().unwrap_or_else(|| "./data".to_string())
    }

    pub fn line_api_url_or_default(&self) -> String {
        self.line_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_LINE_API_URL.to_string())
    }

    /// Returns true if a LINE token is present (otherwise pushes go to the console).
    pub fn is_line_configured(&self) -> bool {
        self.line_channel_access_token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    /// Local offset. Falls back to JST when unset or out of range.
    pub fn local_offset(&self) -> FixedOffset {
        let hours = self.utc_offset_hours.unwrap_or(DEFAULT_UTC_OFFSET_HOURS);
        FixedOffset::east_opt(hours.saturating_mul(3600))
            .or_else(|| FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600))
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn goal_report_time_or_default(&self) -> ClockTime {
        parse_time_or(self.goal_report_time.as_deref(), 22, 0)
    }

    pub fn progress_report_time_or_default(&self) -> ClockTime {
        parse_time_or(self.progress_report_time.as_deref(), 21, 0)
    }

    pub fn scheduler_tick_secs_or_default(&self) -> u64 {
        self.scheduler_tick_secs.unwrap_or(60).max(1)
    }

    /// Parser configuration: configured subjects (or the built-in list) and default labels.
    pub fn parser_config(&self) -> ParserConfig {
        let subjects = match &self.subjects {
            Some(list) if !list.is_empty() => SubjectVocabulary::new(list),
            _ => SubjectVocabulary::default(),
        };
        ParserConfig {
            subjects,
            period_labels: PeriodLabels::default(),
        }
    }
}

fn parse_subject_list(s: &str) -> Vec<String> {
    s.split([',', '、'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn parse_time_or(s: Option<&str>, hour: u32, minute: u32) -> ClockTime {
    s.and_then(ClockTime::parse)
        .or_else(|| ClockTime::new(hour, minute))
        .unwrap_or_default()
}
