//! Integration tests for seega-server API

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use seega_server::{create_router, ServerState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceExt;

fn test_app() -> Router {
    let state = Arc::new(ServerState::new());
    create_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> Value {
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn get(app: &Router, uri: &str) -> Value {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

async fn post(app: &Router, uri: &str, body: Value) -> Value {
    send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

/// App with both seats taken
async fn two_player_app() -> Router {
    let app = test_app();
    assert_eq!(post(&app, "/api/register", json!({})).await["player_id"], 0);
    assert_eq!(post(&app, "/api/register", json!({})).await["player_id"], 1);
    app
}

#[tokio::test]
async fn test_status_endpoint() {
    let app = test_app();
    let json = get(&app, "/api/status").await;

    assert_eq!(json["status"], "ok");
    assert_eq!(json["players"], 0);
}

#[tokio::test]
async fn test_register_fills_two_seats() {
    let app = test_app();

    let first = post(&app, "/api/register", json!({})).await;
    assert_eq!(first["player_id"], 0);
    assert_eq!(first["side"], "A");

    let second = post(&app, "/api/register", json!({})).await;
    assert_eq!(second["player_id"], 1);
    assert_eq!(second["side"], "B");

    let third = post(&app, "/api/register", json!({})).await;
    assert_eq!(third["player_id"], -1);
    assert!(third["error"].as_str().is_some());

    assert_eq!(get(&app, "/api/status").await["players"], 2);
}

#[tokio::test]
async fn test_place_is_broadcast_to_both_players() {
    let app = two_player_app().await;

    let placed = post(
        &app,
        "/api/place",
        json!({ "player_id": 0, "row": 0, "col": 0 }),
    )
    .await;
    assert_eq!(placed["success"], true);
    assert_eq!(placed["messages"], json!(["MOVE 0 0 A", "TURN A 1"]));

    let a = get(&app, "/api/poll?player_id=0").await;
    let b = get(&app, "/api/poll?player_id=1").await;
    assert_eq!(a["messages"], placed["messages"]);
    assert_eq!(b["messages"], placed["messages"]);

    // Drained
    let again = get(&app, "/api/poll?player_id=0").await;
    assert_eq!(again["messages"], json!([]));
}

#[tokio::test]
async fn test_rejected_action_is_private() {
    let app = two_player_app().await;

    let out_of_turn = post(
        &app,
        "/api/place",
        json!({ "player_id": 1, "row": 0, "col": 0 }),
    )
    .await;
    assert_eq!(out_of_turn["success"], false);
    assert_eq!(out_of_turn["messages"], json!(["It is not your turn."]));

    let center = post(
        &app,
        "/api/place",
        json!({ "player_id": 0, "row": 2, "col": 2 }),
    )
    .await;
    assert_eq!(center["success"], false);
    assert_eq!(center["messages"], json!(["Invalid position."]));

    let early_move = post(
        &app,
        "/api/move",
        json!({ "player_id": 0, "from_row": 0, "from_col": 0, "to_row": 0, "to_col": 1 }),
    )
    .await;
    assert_eq!(early_move["success"], false);

    assert_eq!(get(&app, "/api/poll?player_id=0").await["messages"], json!([]));
    assert_eq!(get(&app, "/api/poll?player_id=1").await["messages"], json!([]));
}

#[tokio::test]
async fn test_oversized_values_get_an_explanation() {
    let app = two_player_app().await;

    for row in [9, 200, -40_000] {
        let placed = post(
            &app,
            "/api/place",
            json!({ "player_id": 0, "row": row, "col": 0 }),
        )
        .await;
        assert_eq!(placed["success"], false);
        assert_eq!(placed["messages"], json!(["Invalid position."]));
    }

    let far_move = post(
        &app,
        "/api/move",
        json!({ "player_id": 0, "from_row": 0, "from_col": 0, "to_row": 1000, "to_col": 0 }),
    )
    .await;
    assert_eq!(far_move["success"], false);

    let stranger = post(
        &app,
        "/api/place",
        json!({ "player_id": 300, "row": 0, "col": 0 }),
    )
    .await;
    assert_eq!(stranger["success"], false);
    assert_eq!(stranger["messages"], json!(["Unknown player id: 300"]));

    let chat = post(&app, "/api/chat", json!({ "player_id": -1, "message": "hi" })).await;
    assert_eq!(chat["messages"], json!(["Unknown player id: -1"]));

    assert_eq!(get(&app, "/api/poll?player_id=300").await["messages"], json!([]));
    assert_eq!(get(&app, "/api/poll?player_id=1").await["messages"], json!([]));
    assert_eq!(get(&app, "/api/state").await["pieces"]["A"], 12);
}

#[tokio::test]
async fn test_chat_and_resign() {
    let app = two_player_app().await;

    let chat = post(
        &app,
        "/api/chat",
        json!({ "player_id": 1, "message": "good game" }),
    )
    .await;
    assert_eq!(chat["success"], true);

    let resign = post(&app, "/api/resign", json!({ "player_id": 1 })).await;
    assert_eq!(resign["success"], true);

    let a = get(&app, "/api/poll?player_id=0").await;
    assert_eq!(
        a["messages"],
        json!(["CHAT B: good game", "GAME_OVER Player A wins by resignation."])
    );

    let state = get(&app, "/api/state").await;
    assert_eq!(state["winner"], "A");
    assert_eq!(state["win_reason"], "resignation");
}

#[tokio::test]
async fn test_state_endpoint() {
    let app = two_player_app().await;
    post(
        &app,
        "/api/place",
        json!({ "player_id": 0, "row": 4, "col": 1 }),
    )
    .await;

    let state = get(&app, "/api/state").await;
    assert_eq!(state["turn"], "A");
    assert_eq!(state["phase"], "placement");
    assert_eq!(state["pieces"]["A"], 11);
    assert_eq!(state["pieces"]["B"], 12);
    assert_eq!(state["board"][4][1], "A");
    assert_eq!(state["board"][0][0], Value::Null);
    assert_eq!(state["winner"], Value::Null);
}

#[tokio::test]
async fn test_poll_wait_returns_pending_immediately() {
    let app = two_player_app().await;
    post(&app, "/api/chat", json!({ "player_id": 0, "message": "hi" })).await;

    let started = Instant::now();
    let polled = get(&app, "/api/poll?player_id=1&wait_ms=5000").await;
    assert_eq!(polled["messages"], json!(["CHAT A: hi"]));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_poll_wait_times_out_empty() {
    let app = two_player_app().await;

    let polled = get(&app, "/api/poll?player_id=1&wait_ms=200").await;
    assert_eq!(polled["messages"], json!([]));
}
