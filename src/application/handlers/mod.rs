//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod assistant;
pub mod community;
pub mod report;

pub use assistant::{
    AssistantError, ChatCommand, ChatHandler, CompletionSettings, FindSafeLocationsCommand,
    FindSafeLocationsHandler, FindSupportCommand, FindSupportHandler, StructuredCompletion,
};
pub use community::{ListPostsHandler, PostSubmission, WatchPostsHandler};
pub use report::{ListMyReportsError, ListMyReportsHandler, ListMyReportsQuery, ReportSubmission};
