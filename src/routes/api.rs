// Handler for the /fetch_data endpoint

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use serde::Deserialize;

use crate::{AppState, dataset, error::AppError, filters};

// --- Request Structs ---

#[derive(Debug, Deserialize)]
pub struct FetchDataQuery {
    pub year: Option<i64>,
    pub country: Option<String>,
    pub market: Option<String>,
}

// --- API Handlers ---

/// Download the dataset, apply the provided filters in the fixed order
/// year -> country -> market, fill null cells with empty strings and return
/// the surviving rows as a JSON array. Zero survivors is an error, not an
/// empty array.
pub async fn fetch_data(
    State(app_state): State<AppState>, // Extract AppState
    Query(query): Query<FetchDataQuery>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("[HANDLER] /fetch_data - Request received: {:?}", query);

    // Fresh load on every request; no caching across requests.
    let mut dataset = dataset::load(&app_state.http_client, &app_state.settings.dataset_url)
        .await
        .map_err(AppError::Load)?;
    tracing::info!("[HANDLER] /fetch_data - Loaded dataset with {} rows.", dataset.len());

    if let Some(year) = query.year {
        tracing::debug!("Filtering by year");
        filters::filter_by_year(&mut dataset, year).map_err(AppError::Internal)?;
    }
    if let Some(ref country) = query.country {
        tracing::debug!("Filtering by country");
        filters::filter_by_string(&mut dataset, "country", country).map_err(AppError::Internal)?;
    }
    if let Some(ref market) = query.market {
        tracing::debug!("Filtering by market");
        filters::filter_by_string(&mut dataset, "mkt_name", market).map_err(AppError::Internal)?;
    }

    dataset.fill_null_with_empty();
    tracing::info!(
        "[HANDLER] /fetch_data - {} rows remain after filtering.",
        dataset.len()
    );

    if dataset.is_empty() {
        return Err(AppError::EmptyResult);
    }

    Ok(Json(dataset.rows))
}
