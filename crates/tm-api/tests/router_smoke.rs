use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use tm_api::{create_router, AppState};
use tm_common::context::{ContextPaths, EngineContext};
use tm_common::embedding::{create_embedder, EmbedderConfig};
use tm_common::matching::{RankingConfig, RankingEngine};

fn test_router(dir: &tempfile::TempDir) -> Router {
    let paths = ContextPaths::new(dir.path().join("data"), dir.path().join("models"));
    let config = EmbedderConfig { dimension: 64 };
    let embedder = create_embedder("hash", config.clone());
    let ctx = EngineContext::open(&paths, &config, embedder).unwrap();

    let state = Arc::new(AppState {
        ctx,
        engine: RankingEngine::new(RankingConfig::default()),
        readiness: AtomicBool::new(true),
    });
    create_router(state, &["http://localhost:3000".to_string()])
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn liveness_answers_ok() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir);

    let (status, body) = send(&router, get("/livez")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}

#[tokio::test]
async fn register_then_match_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir);

    let (status, body) = send(
        &router,
        post_json(
            "/api/candidates",
            json!({
                "cv_text": "dez anos com rust e sistemas distribuídos",
                "basic_info": {"name": "Marina", "email": "marina@example.com"}
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "10000");
    assert_eq!(body["indexed"], true);

    let (status, body) = send(
        &router,
        post_json(
            "/api/jobs",
            json!({
                "title": "Desenvolvedor Rust",
                "main_activities": "sistemas distribuídos com rust"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "5000");

    let (status, body) = send(&router, get("/api/jobs/5000/matches?count=5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job_id"], "5000");
    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["candidate_id"], "10000");
    assert_eq!(matches[0]["name"], "Marina");
    assert_eq!(matches[0]["record"]["basic_info"]["email"], "marina@example.com");

    let score = matches[0]["final_score"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&score));

    let (status, body) = send(&router, get("/api/jobs/5000/matches/export")).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Marina");
    assert!(rows[0].get("record").is_none());
}

#[tokio::test]
async fn matching_an_unknown_job_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir);

    let (status, body) = send(&router, get("/api/jobs/9999/matches")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn matching_with_no_candidates_returns_an_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir);

    send(
        &router,
        post_json("/api/jobs", json!({"title": "Dev Backend"})),
    )
    .await;

    let (status, body) = send(&router, get("/api/jobs/5000/matches")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matches"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn prospect_requires_a_candidate_id() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir);

    let (status, body) = send(
        &router,
        post_json("/api/prospects", json!({"status": "Contratado"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");

    let (status, body) = send(
        &router,
        post_json(
            "/api/prospects",
            json!({"candidate_id": "10000", "status": "Contratado"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn stats_and_export_reflect_registered_records() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir);

    send(
        &router,
        post_json(
            "/api/candidates",
            json!({"cv_text": "analista de dados", "basic_info": {"name": "Paulo"}}),
        ),
    )
    .await;

    let (status, body) = send(&router, get("/api/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["candidates"], 1);
    assert_eq!(body["indexed_candidates"], 1);
    assert_eq!(body["jobs"], 0);

    let (status, body) = send(&router, get("/api/candidates/10000/export")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["basic_info"]["name"], "Paulo");

    let (status, _) = send(&router, get("/api/candidates/99999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
