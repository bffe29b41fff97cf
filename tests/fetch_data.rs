// End-to-end tests for the /fetch_data endpoint. A tiny in-process axum
// server stands in for the remote object store; the real router is driven
// with tower's oneshot.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use reqwest::Client;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;

use market_data_api::{AppState, config::Settings, routes};

const FIXTURE_CSV: &str = "year,country,mkt_name,price\n\
                           2020,USA,Retail,10.5\n\
                           2021,USA,Retail,\n\
                           2021,Kenya,Wholesale,3.25\n";

/// Serve `body` at /total_data.csv on an ephemeral port; returns the URL.
async fn spawn_fixture_store(body: &'static str) -> String {
    let app = Router::new().route("/total_data.csv", get(move || async move { body }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/total_data.csv", addr)
}

fn app_with_dataset_url(dataset_url: String) -> Router {
    let settings = Settings {
        dataset_url,
        server_address: "127.0.0.1:0".to_string(),
    };
    let app_state = AppState {
        settings: Arc::new(settings),
        http_client: Arc::new(Client::new()),
    };
    routes::create_router(app_state)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn no_filters_returns_whole_dataset_in_order() {
    let url = spawn_fixture_store(FIXTURE_CSV).await;
    let app = app_with_dataset_url(url);

    let (status, body) = get_json(app, "/fetch_data").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["year"], json!(2020));
    assert_eq!(rows[1]["year"], json!(2021));
    assert_eq!(rows[2]["country"], json!("Kenya"));
    // Null price cell comes back as an empty string, not null
    assert_eq!(rows[1]["price"], json!(""));
    assert_eq!(rows[0]["price"], json!(10.5));
}

#[tokio::test]
async fn year_filter_returns_matching_rows_only() {
    let url = spawn_fixture_store(FIXTURE_CSV).await;
    let app = app_with_dataset_url(url);

    let (status, body) = get_json(app, "/fetch_data?year=2020").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["year"], json!(2020));
    assert_eq!(rows[0]["country"], json!("USA"));
}

#[tokio::test]
async fn combined_filters_apply_as_logical_and() {
    let url = spawn_fixture_store(FIXTURE_CSV).await;
    let app = app_with_dataset_url(url);

    let (status, body) =
        get_json(app, "/fetch_data?year=2021&country=USA&market=Retail").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["mkt_name"], json!("Retail"));
}

#[tokio::test]
async fn unmatched_filters_return_error_body_not_empty_array() {
    let url = spawn_fixture_store(FIXTURE_CSV).await;
    let app = app_with_dataset_url(url);

    let (status, body) = get_json(app, "/fetch_data?year=2099").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "error": "No data found for the specified filters." })
    );
}

#[tokio::test]
async fn missing_filter_column_is_surfaced_as_error() {
    // Dataset without a 'country' column
    let url = spawn_fixture_store("year,mkt_name\n2020,Retail\n").await;
    let app = app_with_dataset_url(url);

    let (status, body) = get_json(app, "/fetch_data?country=USA").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("country"));
}

#[tokio::test]
async fn unreachable_store_yields_load_error_body() {
    // Port 9 (discard) is not listening; the fetch fails fast
    let app = app_with_dataset_url("http://127.0.0.1:9/total_data.csv".to_string());

    let (status, body) = get_json(app, "/fetch_data").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("Failed to fetch dataset"));
}

#[tokio::test]
async fn identical_requests_return_identical_bodies() {
    let url = spawn_fixture_store(FIXTURE_CSV).await;
    let app = app_with_dataset_url(url);

    let (_, first) = get_json(app.clone(), "/fetch_data?country=USA").await;
    let (_, second) = get_json(app, "/fetch_data?country=USA").await;
    assert_eq!(first, second);
}
