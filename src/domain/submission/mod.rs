//! Submission module - Shared lifecycle of user-submitted forms.

mod errors;
mod status;

pub use errors::{PersistenceError, SubmissionError};
pub use status::SubmissionStatus;
