//! Console messenger for running without LINE credentials.
//!
//! Logs every push and keeps a copy so tests and the TUI can inspect what would have been sent.

use crate::domain::DomainError;
use crate::ports::MessengerPort;
use std::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub user_id: String,
    pub text: String,
}

#[derive(Default)]
pub struct ConsoleMessenger {
    sent: Mutex<Vec<SentMessage>>,
}

impl ConsoleMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages pushed so far, oldest first.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl MessengerPort for ConsoleMessenger {
    async fn push_text(&self, user_id: &str, text: &str) -> Result<(), DomainError> {
        info!(user_id, text, "[CONSOLE] push");
        self.sent
            .lock()
            .map_err(|e| DomainError::Messenger(e.to_string()))?
            .push(SentMessage {
                user_id: user_id.to_string(),
                text: text.to_string(),
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_pushes_in_order() {
        let m = ConsoleMessenger::new();
        m.push_text("U1", "a").await.unwrap();
        m.push_text("U2", "b").await.unwrap();
        let sent = m.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].user_id, "U2");
    }
}
