//! API integration tests
//!
//! These run against a live server (and its gym backend) on localhost.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_openapi_document() {
    let client = Client::new();

    let response = client
        .get("http://localhost:8080/api-docs/openapi.json")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["paths"]["/maintenance/filter"].is_object());
}

#[tokio::test]
#[ignore]
async fn test_unconstrained_filter_matches_listing() {
    let client = Client::new();

    let listed: Vec<Value> = client
        .get(format!("{}/tickets", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let filtered: Vec<Value> = client
        .get(format!("{}/tickets/filter?status=ALL&priority=ALL", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(listed, filtered);
}

#[tokio::test]
#[ignore]
async fn test_invalid_cost_filter() {
    let client = Client::new();

    let response = client
        .get(format!("{}/costs?filter=March", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["message"],
        "Invalid format. Use YYYY for year or YYYY-MM for month"
    );
}

#[tokio::test]
#[ignore]
async fn test_cost_report_years_descending() {
    let client = Client::new();

    let body: Value = client
        .get(format!("{}/costs/report", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let years: Vec<&str> = body["years"]
        .as_array()
        .expect("years array")
        .iter()
        .filter_map(|y| y["year"].as_str())
        .collect();
    let mut sorted = years.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(years, sorted);
}

#[tokio::test]
#[ignore]
async fn test_calendar_window() {
    let client = Client::new();

    let response = client
        .get(format!("{}/maintenance/calendar?month=2024-05", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["window"], json!(["2024-04", "2024-05", "2024-06"]));
    assert_eq!(body["months"][1]["days"].as_array().map(Vec::len), Some(31));
}

#[tokio::test]
#[ignore]
async fn test_calendar_rejects_bad_month() {
    let client = Client::new();

    let response = client
        .get(format!("{}/maintenance/calendar?month=2024-13", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_ticket_requires_a_raiser() {
    let client = Client::new();

    let response = client
        .post(format!("{}/tickets", BASE_URL))
        .json(&json!({
            "type": "Equipment",
            "description": "Cable snapped on lat pulldown"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_unknown_status_is_rejected() {
    let client = Client::new();

    let tickets: Vec<Value> = client
        .get(format!("{}/tickets", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let Some(id) = tickets.first().and_then(|t| t["id"].as_i64()) else {
        return;
    };

    let response = client
        .put(format!("{}/tickets/{}/status", BASE_URL, id))
        .json(&json!({ "status": "REOPENED" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
}
