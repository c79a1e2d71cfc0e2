//! Application use cases. Orchestrate domain logic via ports.

pub mod batch;
pub mod goal_report_service;
pub mod message_service;
pub mod progress_service;
pub mod reminder_service;
pub mod reply;
pub mod scheduler_service;

pub use batch::BatchStats;
pub use goal_report_service::GoalReportService;
pub use message_service::{HandledMessage, MessageService};
pub use progress_service::ProgressService;
pub use reminder_service::ReminderService;
pub use scheduler_service::{Schedule, SchedulerService, TickSummary};
