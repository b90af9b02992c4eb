use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::StrictStatus;

/// Rewrite flattened 400 error responses to their per-class status (404, 409, ...).
/// Installed only when `api.strict_status_codes` is enabled.
pub async fn strict_status_codes(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    if let Some(StrictStatus(status)) = response.extensions().get::<StrictStatus>().copied() {
        *response.status_mut() = status;
    }
    response
}
