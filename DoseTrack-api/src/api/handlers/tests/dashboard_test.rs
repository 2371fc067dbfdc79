use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use tower::ServiceExt;

use crate::api::routes::create_app;
use super::{body_json, get, post_json};

fn medication_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "half_life_minutes": 7200.0,
        "concentration_mg_per_ml": 250.0
    })
}

fn injection_body(name: &str, dose_mg: f64) -> serde_json::Value {
    // Dosed a few days ago so every daily sample since then is positive,
    // regardless of the time of day the test runs
    let timestamp = (Utc::now() - Duration::days(3)).to_rfc3339();
    json!({
        "medication_name": name,
        "dose_amount": dose_mg,
        "dose_unit": "mg",
        "timestamp": timestamp
    })
}

#[tokio::test]
async fn test_dashboard_with_empty_history() {
    let app = create_app();

    let response = app.oneshot(get("/dashboard?window=week")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["series"].as_array().unwrap().is_empty());
    assert_eq!(body["statistics"]["max"], 0.0);
    assert_eq!(body["statistics"]["min"], 0.0);
    assert_eq!(body["statistics"]["average"], 0.0);
}

#[tokio::test]
async fn test_dashboard_rejects_unknown_window() {
    let app = create_app();

    let response = app.oneshot(get("/dashboard?window=fortnight")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_defaults_to_week_window() {
    let app = create_app();

    let response = app.oneshot(get("/dashboard")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["window"], "week");
}

#[tokio::test]
async fn test_dashboard_aggregates_testosterone_esters() {
    let app = create_app();

    for name in ["Testosterone Enanthate", "Testosterone Cypionate"] {
        let response = app
            .clone()
            .oneshot(post_json("/medications", medication_body(name)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(post_json("/injections", injection_body(name, 150.0)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get("/dashboard?window=week")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    // Two medication series plus the aggregate
    let series = body["series"].as_array().unwrap();
    assert_eq!(series.len(), 3);

    let aggregate = series
        .iter()
        .find(|s| s["aggregate"] == true)
        .expect("aggregate series must be present");
    assert_eq!(aggregate["label"], "Total T");
    assert_eq!(aggregate["points"].as_array().unwrap().len(), 7);

    // Residual levels from the doses three days ago are visible
    assert!(body["statistics"]["max"].as_f64().unwrap() > 0.0);
    assert!(body["statistics"]["average"].as_f64().unwrap() > 0.0);
}
