use axum::extract::FromRef;
use reqwest::Client;
use std::sync::Arc;

pub mod config;
pub mod dataset;
pub mod error;
pub mod filters;
pub mod routes;

use crate::config::Settings;

// Shared application state passed to every handler via the State extractor
#[derive(Clone, FromRef)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub http_client: Arc<Client>,
}
