//! Webhook transport for lead submissions.

use gloo_net::http::Request;
use log::debug;
use voicefx_core::FxError;
use voicefx_site::LeadSubmission;

/// POSTs the payload once and returns the HTTP status. Network failures
/// become `FxError::Transport`; the status is judged by the caller.
pub async fn post_lead(webhook_url: &str, payload: &LeadSubmission) -> Result<u16, FxError> {
    let response = Request::post(webhook_url)
        .json(payload)
        .map_err(|e| FxError::Transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| FxError::Transport(e.to_string()))?;
    debug!("lead webhook answered {}", response.status());
    Ok(response.status())
}
