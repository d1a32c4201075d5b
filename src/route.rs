//! Route definitions for the link registry API

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{create_link, delete_link, get_link, list_links, redirect_link, AppState};

/// Creates and configures the Axum application router with all routes
///
/// # Route Definitions
///
/// - `GET /{code}` - Redirects to the target URL and counts the click
/// - `GET /api/links` - Lists all links, newest first
/// - `POST /api/links` - Creates a link
/// - `GET /api/links/{code}` - Fetches one link without counting a click
/// - `DELETE /api/links/{code}` - Deletes a link
///
/// # Example Usage
///
/// ```no_run
/// # use std::sync::Arc;
/// # use linkreg::handler::AppState;
/// # use linkreg::registry::LinkRegistry;
/// # use linkreg::route::create_app;
/// # use linkreg::store::MemoryStore;
/// let registry = LinkRegistry::new(Arc::new(MemoryStore::new()));
/// let app = create_app(AppState::new(registry));
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/links", get(list_links).post(create_link))
        .route("/links/{code}", get(get_link).delete(delete_link));

    Router::new()
        .route("/{code}", get(redirect_link))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
