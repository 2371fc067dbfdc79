use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::api::routes::create_app;
use super::{body_json, get, post_json};

fn medication_body() -> serde_json::Value {
    json!({
        "name": "Testosterone Enanthate",
        "half_life_minutes": 7200.0,
        "concentration_mg_per_ml": 250.0
    })
}

fn injection_body(amount: f64, unit: &str) -> serde_json::Value {
    json!({
        "medication_name": "Testosterone Enanthate",
        "dose_amount": amount,
        "dose_unit": unit,
        "timestamp": "2024-06-20T08:30:00Z",
        "site": "left glute",
        "rating": 4
    })
}

#[tokio::test]
async fn test_create_injection_requires_known_medication() {
    let app = create_app();

    let response = app
        .oneshot(post_json("/injections", injection_body(200.0, "mg")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_injection_crud_flow() {
    let app = create_app();

    // Register the medication first
    let response = app
        .clone()
        .oneshot(post_json("/medications", medication_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Log an injection
    let response = app
        .clone()
        .oneshot(post_json("/injections", injection_body(200.0, "mg")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["dosage_mg"], 200.0);
    // Half-life captured from the medication definition
    assert_eq!(created["half_life_minutes"], 7200.0);
    let id = created["id"].as_str().unwrap().to_string();

    // The event shows up in the history
    let response = app.clone().oneshot(get("/injections")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let history = body_json(response).await;
    assert_eq!(history.as_array().unwrap().len(), 1);

    // Fetch it by ID
    let response = app
        .clone()
        .oneshot(get(&format!("/injections/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Delete it
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/injections/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone from the history
    let response = app.oneshot(get("/injections")).await.unwrap();
    let history = body_json(response).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_ml_dose_converted_to_mg() {
    let app = create_app();

    let response = app
        .clone()
        .oneshot(post_json("/medications", medication_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_json("/injections", injection_body(1.5, "ml")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // 1.5 ml at 250 mg/ml
    let created = body_json(response).await;
    assert_eq!(created["dosage_mg"], 375.0);
}

#[tokio::test]
async fn test_get_injection_unknown_id_is_not_found() {
    let app = create_app();

    let response = app
        .oneshot(get(&format!("/injections/{}", uuid::Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
