//! HTTP routes for the client session endpoint.

use axum::{routing::get, Router};

use super::handlers::{get_session, start_session};

pub fn session_routes() -> Router {
    Router::new().route("/", get(get_session).post(start_session))
}
