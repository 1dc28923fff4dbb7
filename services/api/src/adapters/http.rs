//! Status and transport error mapping for the Unsplash search adapter.

use adventure_pack_core::ports::{PortError, PortResult};
use reqwest::StatusCode;

/// Ensure the response has a success status code. Returns the response
/// unchanged on success; auth failures map to `Unauthorized`, everything
/// else to `Unexpected` with the body text attached.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    service: &str,
) -> PortResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(status_error(service, status, &body))
}

pub(crate) fn status_error(service: &str, status: StatusCode, body: &str) -> PortError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PortError::Unauthorized(format!("{} rejected the credentials ({})", service, status))
        }
        _ => PortError::Unexpected(format!("{} API error ({}): {}", service, status, body)),
    }
}

pub(crate) fn map_transport_error(e: reqwest::Error) -> PortError {
    PortError::Unexpected(format!("HTTP request failed: {}", e))
}
