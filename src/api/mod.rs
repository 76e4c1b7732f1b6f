//! HTTP surface: landing page and webhook ingress

pub mod webhook;

pub use webhook::handle_webhook;

use axum::{Router, extract::DefaultBodyLimit, routing};

use crate::SharedState;
use crate::ui::landing_page;

/// GitHub caps webhook payloads at 25 MB.
const MAX_WEBHOOK_BODY_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", routing::get(landing_page))
        .route(
            "/webhook/{project_name}",
            routing::post(handle_webhook).layer(DefaultBodyLimit::max(MAX_WEBHOOK_BODY_BYTES)),
        )
        .with_state(state)
}
