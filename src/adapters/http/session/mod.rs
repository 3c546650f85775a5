//! HTTP adapter for the client session.
//!
//! - `GET /api/session` - Current identity (or null) and submission statuses
//! - `POST /api/session` - Stores the session and echoes its id

mod dto;
mod handlers;
mod routes;

pub use dto::{IdentityResponse, SessionStateResponse};
pub use routes::session_routes;
