//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use sprout_core::db::Database;
use sprout_core::models::{Gender, NewBaby, NewSleepSession, SleepKind};
use tower::ServiceExt;

const CALLER: &str = "alex";

fn setup_test_app() -> (Router, Database, i64) {
    let db = Database::in_memory().unwrap();
    let baby_id = db
        .insert_baby(&NewBaby {
            name: "Nora".to_string(),
            date_of_birth: (Utc::now() - Duration::days(75)).date_naive(),
            gender: Gender::Female,
        })
        .unwrap();
    db.grant_access(baby_id, CALLER).unwrap();

    let engine = InsightEngine::from_database(db.clone()).with_ai(AIClient::mock());
    let app = create_router(db.clone(), engine, ServerConfig::default());
    (app, db, baby_id)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(CALLER_HEADER, CALLER)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _db, _baby_id) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_list_babies_filters_by_access() {
    let (app, db, _baby_id) = setup_test_app();
    // A second baby the caller may not read
    db.insert_baby(&NewBaby {
        name: "Theo".to_string(),
        date_of_birth: (Utc::now() - Duration::days(200)).date_naive(),
        gender: Gender::Male,
    })
    .unwrap();

    let response = app.oneshot(get("/api/babies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let babies = json.as_array().unwrap();
    assert_eq!(babies.len(), 1);
    assert_eq!(babies[0]["name"], "Nora");
}

#[tokio::test]
async fn test_create_baby_grants_creator_access() {
    let (app, _db, _baby_id) = setup_test_app();

    let body = serde_json::json!({
        "name": "Theo",
        "date_of_birth": "2026-06-01",
        "gender": "male"
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/babies")
                .header("content-type", "application/json")
                .header(CALLER_HEADER, CALLER)
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let id = json["id"].as_i64().unwrap();

    let response = app
        .oneshot(get(&format!("/api/babies/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_insights_report() {
    let (app, db, baby_id) = setup_test_app();
    let start = Utc::now().date_naive().and_hms_opt(9, 0, 0).unwrap().and_utc();
    db.insert_sleep_session(
        baby_id,
        &NewSleepSession {
            start_time: start,
            end_time: start + Duration::minutes(90),
            kind: SleepKind::Nap,
            notes: None,
        },
    )
    .unwrap();

    let response = app
        .oneshot(get(&format!(
            "/api/babies/{}/insights?period=weekly",
            baby_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["baby_id"], baby_id);
    assert_eq!(json["period"], "weekly");
    assert_eq!(json["sleep"]["total_minutes"], 90);
    assert_eq!(json["ai_generated"], true);
    assert!(json["narrative"].as_str().unwrap().contains("Nora"));
}

#[tokio::test]
async fn test_insights_rejects_unknown_period() {
    let (app, _db, baby_id) = setup_test_app();

    let response = app
        .oneshot(get(&format!(
            "/api/babies/{}/insights?period=hourly",
            baby_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_insights_access_denied() {
    let (app, _db, baby_id) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/babies/{}/insights", baby_id))
                .header(CALLER_HEADER, "stranger")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_insights_unknown_baby_is_404() {
    let (app, db, _baby_id) = setup_test_app();
    db.grant_access(9999, CALLER).unwrap();

    let response = app
        .oneshot(get("/api/babies/9999/insights"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_anomalies_endpoint() {
    let (app, _db, baby_id) = setup_test_app();

    let response = app
        .oneshot(get(&format!("/api/babies/{}/anomalies", baby_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json["anomalies"].as_array().unwrap().is_empty());
    assert!(!json["narrative"]["text"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_log_and_delete_event() {
    let (app, _db, baby_id) = setup_test_app();

    let body = serde_json::json!({
        "timestamp": Utc::now().to_rfc3339(),
        "kind": "wet"
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/babies/{}/events/diaper", baby_id))
                .header("content-type", "application/json")
                .header(CALLER_HEADER, CALLER)
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let event_id = json["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/events/diaper/{}", event_id))
                .header(CALLER_HEADER, CALLER)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Deleting again is a 404
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/events/diaper/{}", event_id))
                .header(CALLER_HEADER, CALLER)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sleep_prediction_endpoint() {
    let (app, db, baby_id) = setup_test_app();
    let midnight = Utc::now().date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc();
    for i in 0..3 {
        let start = midnight + Duration::hours(2 * i);
        db.insert_sleep_session(
            baby_id,
            &NewSleepSession {
                start_time: start,
                end_time: start + Duration::minutes(60),
                kind: SleepKind::Nap,
                notes: None,
            },
        )
        .unwrap();
    }

    let response = app
        .oneshot(get(&format!(
            "/api/babies/{}/predictions/sleep",
            baby_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert!(json["prediction"]["confidence"].as_f64().unwrap() > 0.0);
    assert_eq!(json["narrative"]["generated"], true);
}
