//! Application layer - Session gate, submission coordinators and handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Writes go through a [`SubmissionCoordinator`] guarded by the client
//! session's [`SessionGate`]; reads and assistant calls are plain handlers.

pub mod client_session;
pub mod handlers;
mod session_gate;
mod submission;

pub use client_session::{
    ClientSession, ClientSessionRegistry, SessionCapacityError, SessionServices,
    DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL,
};
pub use session_gate::SessionGate;
pub use submission::{Submission, SubmissionCoordinator, SubmitOutcome};
