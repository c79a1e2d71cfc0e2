//! Message handling use case: parse → persist → reply.
//!
//! Parsing never fails; store errors become a distinct delivery-failure reply.

use crate::domain::{
    ClassifiedIntent, DailyGoalRecord, DomainError, GoalFields, InboundMessage, MessageParser,
    NotificationUpdateFields, ParseOutcome, StudyLogFields, StudyLogRecord,
};
use crate::ports::{GoalRepo, NotificationRepo, StudyLogRepo};
use crate::shared::clock::LocalClock;
use crate::usecases::reply;
use std::sync::Arc;
use tracing::{info, warn};

/// What happened to one inbound message.
#[derive(Debug, Clone)]
pub struct HandledMessage {
    /// Classifier verdict, kept even when extraction then failed.
    pub intent: ClassifiedIntent,
    pub outcome: ParseOutcome,
    pub reply: String,
    /// True when the outcome was written to the store.
    pub persisted: bool,
}

pub struct MessageService {
    parser: Arc<MessageParser>,
    logs: Arc<dyn StudyLogRepo>,
    goals: Arc<dyn GoalRepo>,
    notifications: Arc<dyn NotificationRepo>,
    clock: LocalClock,
}

impl MessageService {
    pub fn new(
        parser: Arc<MessageParser>,
        logs: Arc<dyn StudyLogRepo>,
        goals: Arc<dyn GoalRepo>,
        notifications: Arc<dyn NotificationRepo>,
        clock: LocalClock,
    ) -> Self {
        Self {
            parser,
            logs,
            goals,
            notifications,
            clock,
        }
    }

    /// Handle one message. Always produces a reply for the user.
    pub async fn handle_message(&self, msg: &InboundMessage) -> HandledMessage {
        let (intent, outcome) = self.parser.handle_classified(&msg.text);
        info!(user_id = %msg.user_id, %intent, "message classified");

        let stored = match &outcome {
            ParseOutcome::Notification(f) => self.save_notification(&msg.user_id, f).await,
            ParseOutcome::Goal(g) => self.save_goal(msg, g).await,
            ParseOutcome::StudyLog(f) => self.save_study_log(msg, f).await,
            ParseOutcome::Failure(f) => {
                info!(user_id = %msg.user_id, reason = ?f.reason, "message not understood");
                let reply = reply::failure_reply(f.reason);
                return HandledMessage {
                    intent,
                    outcome,
                    reply,
                    persisted: false,
                };
            }
        };

        match stored {
            Ok(()) => {
                let reply = reply::outcome_reply(&outcome, self.parser.period_labels());
                HandledMessage {
                    intent,
                    outcome,
                    reply,
                    persisted: true,
                }
            }
            Err(e) => {
                warn!(user_id = %msg.user_id, error = %e, "failed to persist message");
                HandledMessage {
                    intent,
                    outcome,
                    reply: reply::store_failure_reply(&e.to_string()),
                    persisted: false,
                }
            }
        }
    }

    async fn save_notification(
        &self,
        user_id: &str,
        fields: &NotificationUpdateFields,
    ) -> Result<(), DomainError> {
        self.notifications
            .set_notification(user_id, fields.period, fields.clock_time)
            .await?;
        info!(user_id, period = fields.period.key(), time = %fields.clock_time, "notification updated");
        Ok(())
    }

    async fn save_goal(&self, msg: &InboundMessage, goal: &GoalFields) -> Result<(), DomainError> {
        let today = self.clock.to_local(msg.received_at).date_naive();
        let record = DailyGoalRecord {
            user_id: msg.user_id.clone(),
            goal: goal.clone(),
            start_date: today,
            end_date: today,
            created_at: today,
        };
        self.goals.upsert_goal(&record).await?;
        info!(user_id = %msg.user_id, value = goal.value, metric = goal.metric.as_str(), "daily goal saved");
        Ok(())
    }

    async fn save_study_log(
        &self,
        msg: &InboundMessage,
        fields: &StudyLogFields,
    ) -> Result<(), DomainError> {
        let local = self.clock.to_local(msg.received_at);
        let record = StudyLogRecord {
            user_id: msg.user_id.clone(),
            logged_at: local.to_rfc3339(),
            local_date: local.date_naive(),
            subject: fields.subject.clone(),
            minutes: fields.duration_minutes,
            raw_message: msg.text.clone(),
        };
        self.logs.append_log(&record).await?;
        info!(user_id = %msg.user_id, subject = %fields.subject, minutes = fields.duration_minutes, "study log recorded");
        Ok(())
    }
}
