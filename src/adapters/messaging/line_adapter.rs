//! LINE Messaging API adapter. Implements MessengerPort via the push endpoint.

use crate::domain::DomainError;
use crate::ports::MessengerPort;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_LINE_API_URL: &str = "https://api.line.me";
const PUSH_PATH: &str = "/v2/bot/message/push";

/// Pushes text messages to LINE users.
///
/// Requires a channel access token from the LINE developers console.
pub struct LineAdapter {
    client: Arc<Client>,
    api_url: String,
    access_token: String,
}

impl LineAdapter {
    /// # Arguments
    /// * `api_url` - Base URL, normally [`DEFAULT_LINE_API_URL`]
    /// * `access_token` - Channel access token (bearer)
    pub fn new(api_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    fn push_url(&self) -> String {
        format!("{}{}", self.api_url, PUSH_PATH)
    }
}

/// Request body for a single text push.
pub fn push_body(user_id: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "to": user_id,
        "messages": [{ "type": "text", "text": text }],
    })
}

#[async_trait::async_trait]
impl MessengerPort for LineAdapter {
    async fn push_text(&self, user_id: &str, text: &str) -> Result<(), DomainError> {
        debug!(user_id, len = text.len(), "pushing LINE message");
        let res = self
            .client
            .post(self.push_url())
            .bearer_auth(&self.access_token)
            .json(&push_body(user_id, text))
            .send()
            .await
            .map_err(|e| DomainError::Messenger(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::Messenger(format!(
                "LINE API error {}: {}",
                status, body
            )));
        }

        info!(user_id, "LINE push sent");
        Ok(())
    }
}
