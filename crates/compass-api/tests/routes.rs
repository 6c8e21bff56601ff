//! 라우터 통합 테스트 (`tower::ServiceExt::oneshot`)

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use compass_api::{create_router, create_test_state};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_router().with_state(Arc::new(create_test_state()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let (status, _) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn catalog_lists_twelve_engines() {
    let (status, body) = send(&app(), get("/api/v1/engines")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 12);
    assert_eq!(body["engines"][0]["id"], "growth_equity");
}

#[tokio::test]
async fn unknown_engine_is_404() {
    let (status, body) = send(&app(), get("/api/v1/engines/rockets")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ENGINE_NOT_FOUND");
}

#[tokio::test]
async fn known_engine_is_returned() {
    let (status, body) = send(&app(), get("/api/v1/engines/bitcoin_optionality")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["layer"], "volatility");
}

#[tokio::test]
async fn mock_scores_gate_bitcoin() {
    let (status, body) = send(&app(), get("/api/v1/engines/scores?mock=true")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["usedMockData"], true);
    assert!(body.get("fallback").is_none());

    let scores = body["data"]["engineScores"].as_array().unwrap();
    assert_eq!(scores.len(), 12);
    let bitcoin = scores.iter().find(|s| s["engine"] == "bitcoin_optionality").unwrap();
    assert!(bitcoin["status"] == "GATED" || bitcoin["stance"] == "UNDERWEIGHT");
    for score in scores {
        let value = score["score"].as_u64().unwrap();
        assert!(value <= 100);
        if score["status"] == "GATED" {
            assert_ne!(score["stance"], "OVERWEIGHT");
        }
    }
    assert_eq!(body["macroInputs"]["hyOAS"], 480.0);
}

#[tokio::test]
async fn empty_store_serves_demo_portfolio() {
    let (status, body) = send(&app(), get("/api/v1/portfolio")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["useDemoHoldings"], true);

    let (status, summary) = send(&app(), get("/api/v1/portfolio/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["usedDemoHoldings"], true);
    assert_eq!(summary["isValid"], true);
}

#[tokio::test]
async fn put_then_summarize_portfolio() {
    let app = app();
    let request = json!({
        "holdings": [
            { "ticker": "aapl", "account": "TAXABLE", "weightPct": "60" },
            { "ticker": "SGOV", "account": "ROTH", "weightPct": "40" }
        ]
    });

    let (status, saved) = send(&app, put_json("/api/v1/portfolio", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["holdings"][0]["ticker"], "AAPL");
    assert!(saved["updatedAt"].is_string());

    let (status, summary) = send(&app, get("/api/v1/portfolio/summary")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["isValid"], true);
    assert_eq!(summary["usedDemoHoldings"], false);
    assert_eq!(summary["classifications"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn put_rejects_negative_weight() {
    let request = json!({
        "holdings": [{ "ticker": "QQQ", "account": "TAXABLE", "weightPct": "-5" }]
    });
    let (status, body) = send(&app(), put_json("/api/v1/portfolio", request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn mock_policy_avoids_volatility() {
    let (status, body) = send(&app(), get("/api/v1/policy?mock=true")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usedMockData"], true);

    let avoid = body["policy"]["avoidLayers"].as_array().unwrap();
    assert!(avoid.iter().any(|l| l == "volatility"));

    for m in body["suggestedMoves"]["moves"].as_array().unwrap() {
        if m["direction"] == "INCREASE" {
            assert!(!avoid.contains(&m["layer"]));
        }
    }
}

#[tokio::test]
async fn diverging_breadth_never_relaxes_policy() {
    let app = app();
    let (_, base) = send(&app, get("/api/v1/policy?mock=true&breadth=confirming")).await;
    let (_, diverging) = send(&app, get("/api/v1/policy?mock=true&breadth=diverging")).await;

    let base_min = base["policy"]["stabilityMinimum"].as_u64().unwrap();
    let diverging_min = diverging["policy"]["stabilityMinimum"].as_u64().unwrap();
    assert!(diverging_min >= base_min);

    let deploy = diverging["policy"]["deployLayers"].as_array().unwrap();
    assert!(!deploy.iter().any(|l| l == "growth"));
}

#[tokio::test]
async fn invalid_breadth_is_rejected() {
    let (status, _) = send(&app(), get("/api/v1/policy?breadth=sideways")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
