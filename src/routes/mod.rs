// Route definitions

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::AppState;

mod api;

// create_router accepts the AppState; the state is provided here so the
// returned Router is ready to serve.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/fetch_data", get(api::fetch_data))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
