//! Webhook handler for GitHub push and ping events

use axum::{
    body::Bytes,
    extract::{Path, State as AxumState},
    http::HeaderMap,
};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::SharedState;
use crate::error::{RelayError, Result};
use crate::format::format_push_message;
use crate::signature::{SIGNATURE_HEADER, verify_github_signature};
use crate::webhook::{DELIVERY_HEADER, EVENT_HEADER, parse_push_event};
use crate::{AppState, SignaturePolicy};

const PING_EVENT: &str = "ping";

/// POST /webhook/{project_name}
///
/// The body is taken as raw `Bytes` so the signature is checked against the
/// exact bytes GitHub signed; JSON is parsed from the same buffer afterwards.
pub async fn handle_webhook(
    AxumState(state): AxumState<SharedState>,
    Path(project_name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str> {
    let event = header_str(&headers, EVENT_HEADER);
    let span = info_span!(
        "webhook",
        project = %project_name,
        event = event.unwrap_or("-"),
        delivery = header_str(&headers, DELIVERY_HEADER).unwrap_or("-"),
    );

    process_webhook(&state, &project_name, event, &headers, &body)
        .instrument(span)
        .await
        .inspect_err(log_failure)
}

async fn process_webhook(
    state: &AppState,
    project_name: &str,
    event: Option<&str>,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<&'static str> {
    let project = state
        .config
        .get_project(project_name)
        .ok_or_else(|| RelayError::ConfigNotFound(project_name.to_string()))?;

    // Answered before any signature check so connectivity tests always pass.
    if event == Some(PING_EVENT) {
        info!("Received ping for project '{}'", project_name);
        return Ok("pong");
    }

    match &project.signature {
        SignaturePolicy::Verified(secret) => {
            verify_github_signature(secret, body, header_str(headers, SIGNATURE_HEADER))?;
            debug!("Signature verified for project '{}'", project_name);
        }
        SignaturePolicy::SecretMissing => {
            return Err(RelayError::SecretNotConfigured(project_name.to_string()));
        }
        SignaturePolicy::Unverified => {}
    }

    let push = parse_push_event(body)?;
    let text = format_push_message(&push);

    state
        .notifier
        .send_message(&project.bot_token, &project.chat_id, project.thread_id, &text)
        .await?;

    info!(
        "Relayed {} commit(s) from '{}' to chat {}",
        push.commits.len(),
        push.repository.name,
        project.chat_id
    );
    Ok("OK")
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn log_failure(err: &RelayError) {
    if err.status_code().is_server_error() {
        error!("Webhook failed: {}", err);
    } else {
        warn!("Webhook rejected: {}", err);
    }
}
