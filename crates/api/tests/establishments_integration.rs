//! Integration tests for establishment endpoints.

mod common;

use axum::http::StatusCode;
use tower::ServiceExt;

use common::{
    create_test_donation, create_test_establishment, create_test_food_bank, get_request,
    parse_response_body, post_request, setup, unique_name, TestDonation,
};

#[tokio::test]
async fn test_get_establishment_profile() {
    let Some((app, pool)) = setup().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let name = unique_name("Trattoria");
    let id = create_test_establishment(&pool, &name).await;

    let response = app
        .oneshot(get_request(&format!("/api/v1/establishments/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], name);
    assert!(body["address"].is_string());
    assert!(body["contact_phone"].is_string());
}

#[tokio::test]
async fn test_get_unknown_establishment() {
    let Some((app, _pool)) = setup().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let response = app
        .oneshot(get_request("/api/v1/establishments/99999999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Establishment not found");
}

#[tokio::test]
async fn test_establishment_donations_span_all_statuses() {
    let Some((app, pool)) = setup().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let est = create_test_establishment(&pool, &unique_name("Greengrocer")).await;
    let fb = create_test_food_bank(&pool, &unique_name("Larder")).await;

    let available = create_test_donation(&app, est, &TestDonation::new()).await["id"]
        .as_i64()
        .unwrap();
    let reserved = create_test_donation(&app, est, &TestDonation::new()).await["id"]
        .as_i64()
        .unwrap();
    let completed = create_test_donation(&app, est, &TestDonation::new()).await["id"]
        .as_i64()
        .unwrap();

    for uri in [
        format!("/api/v1/donations/{}/reserve/{}", reserved, fb),
        format!("/api/v1/donations/{}/reserve/{}", completed, fb),
        format!("/api/v1/donations/{}/pickup", completed),
    ] {
        let response = app.clone().oneshot(post_request(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(get_request(&format!(
            "/api/v1/establishments/{}/donations",
            est
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 3);

    let status_of = |id: i64| {
        items
            .iter()
            .find(|d| d["id"].as_i64() == Some(id))
            .map(|d| d["status"].as_str().unwrap().to_string())
    };
    assert_eq!(status_of(available).as_deref(), Some("AVAILABLE"));
    assert_eq!(status_of(reserved).as_deref(), Some("RESERVED"));
    assert_eq!(status_of(completed).as_deref(), Some("COMPLETED"));
}

#[tokio::test]
async fn test_unknown_establishment_donations_list_is_empty() {
    let Some((app, _pool)) = setup().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };

    let response = app
        .oneshot(get_request("/api/v1/establishments/99999999/donations"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}
