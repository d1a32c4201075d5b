//! HTTP request handlers for the link registry API
//!
//! Handlers only translate between HTTP and [`LinkRegistry`] calls. Status
//! codes come from [`RegistryError::status_code`].

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::Value;
use tracing::error;

use crate::error::RegistryError;
use crate::model::{CreateRequest, DeleteResponse, ErrorBody, LinkDetail, LinkSummary};
use crate::registry::LinkRegistry;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: LinkRegistry,
}

impl AppState {
    pub fn new(registry: LinkRegistry) -> Self {
        Self { registry }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        if self.is_server_fault() {
            match &self {
                RegistryError::CorruptRecord { code, target_url } => {
                    error!(
                        code = %code,
                        target_url = %target_url,
                        "data integrity alert: stored target URL is invalid"
                    );
                }
                other => error!(error = %other, kind = other.error_code(), "request failed"),
            }
        }

        let body = ErrorBody {
            error: self.to_string(),
            code: self.error_code().to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Creates a new link
///
/// # Request Body
///
/// ```json
/// {
///   "targetUrl": "https://example.com/very/long/url",
///   "code": "mycode1"  // Optional, 6-8 alphanumeric characters
/// }
/// ```
///
/// # Response
///
/// - **201 Created** - link created, body is the link summary
/// - **400 Bad Request** - invalid URL, code format, or unreadable body
/// - **409 Conflict** - code already exists
pub async fn create_link(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkSummary>), RegistryError> {
    let Json(body) =
        payload.map_err(|rejection| RegistryError::InvalidBody(rejection.body_text()))?;
    let link = state.registry.create(CreateRequest::try_from(body)?).await?;
    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists every link, newest first
pub async fn list_links(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkSummary>>, RegistryError> {
    let links = state.registry.list_all().await?;
    Ok(Json(links.into_iter().map(LinkSummary::from).collect()))
}

/// Returns one link including `updatedAt`, without counting a click
pub async fn get_link(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkDetail>, RegistryError> {
    let link = state.registry.get_by_code(&code).await?;
    Ok(Json(link.into()))
}

/// Deletes a link
///
/// # Response
///
/// - **200 OK** - `{"ok": true, "code": "..."}`
/// - **404 Not Found** - no such code, including one that was already deleted
pub async fn delete_link(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, RegistryError> {
    state.registry.delete(&code).await?;
    Ok(Json(DeleteResponse { ok: true, code }))
}

/// Redirects a short code to its target and counts the click
///
/// # Response
///
/// - **307 Temporary Redirect** - `Location` is the target URL
/// - **404 Not Found** - unknown code
/// - **500 Internal Server Error** - the stored target is no longer a valid URL
///
/// # Note
///
/// 307 keeps browsers from caching the redirect, so every visit reaches the
/// registry and is counted.
pub async fn redirect_link(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, RegistryError> {
    let target = state.registry.redirect(&code).await?;
    Ok(Redirect::temporary(target.as_str()))
}
