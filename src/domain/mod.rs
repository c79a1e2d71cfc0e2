//! Core domain layer. No external I/O dependencies.
//!
//! Entities, the message parser and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod parser;

pub use entities::{
    ClassifiedIntent, ClockTime, DailyGoalRecord, GoalFields, GoalMetric, GoalUnit,
    InboundMessage, NotificationSettings, NotificationTime, NotificationUpdateFields,
    ParseFailure, ParseFailureReason, ParseOutcome, Period, StudyLogFields, StudyLogRecord,
    SubjectTotal,
};
pub use errors::DomainError;
pub use parser::{MessageParser, ParserConfig, PeriodLabels, SubjectVocabulary};
