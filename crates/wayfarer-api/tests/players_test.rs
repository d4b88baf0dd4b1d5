//! Integration tests for the Players bounded context.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use wayfarer_core::ephemeral::{membership_key, position_key};

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_and_get_player_round_trip(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);

    // POST /api/v1/players
    let (status, json) = common::post_json(
        &app,
        "/api/v1/players",
        &json!({ "username": "alice", "password": "hunter2" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["username"], "alice");
    assert_eq!(json["created_at"], "2026-01-15T10:00:00Z");

    // GET /api/v1/players/alice
    let (status, json) = common::get_json(&app, "/api/v1/players/alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["username"], "alice");
    assert!(json["position"].is_null());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_duplicate_player_returns_409(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    let body = json!({ "username": "alice", "password": "hunter2" });
    common::post_json(&app, "/api/v1/players", &body).await;

    let (status, json) = common::post_json(&app, "/api/v1/players", &body).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "duplicate_identity");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_login_and_password_change(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    common::post_json(
        &app,
        "/api/v1/players",
        &json!({ "username": "alice", "password": "hunter2" }),
    )
    .await;

    let (status, json) = common::post_json(
        &app,
        "/api/v1/login",
        &json!({ "username": "alice", "password": "hunter2" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["expires_at"], "2026-01-15T11:00:00Z");

    let (status, _) = common::patch_json(
        &app,
        "/api/v1/players/alice",
        &json!({ "password": "correct-horse" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = common::post_json(
        &app,
        "/api/v1/login",
        &json!({ "username": "alice", "password": "hunter2" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "auth_failure");

    let (status, _) = common::post_json(
        &app,
        "/api/v1/login",
        &json!({ "username": "alice", "password": "correct-horse" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_login_unknown_player_returns_404(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);

    let (status, _) = common::post_json(
        &app,
        "/api/v1/login",
        &json!({ "username": "ghost", "password": "x" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_travel_move_and_travel_again(pool: PgPool) {
    let (app, store) = common::build_test_app(pool);
    common::post_json(
        &app,
        "/api/v1/players",
        &json!({ "username": "alice", "password": "hunter2" }),
    )
    .await;
    for name in ["town", "harbor"] {
        common::post_json(&app, "/api/v1/locations", &json!({ "name": name })).await;
    }

    // Travel to town.
    let (status, json) = common::post_json(
        &app,
        "/api/v1/players/alice/travel",
        &json!({ "destination": "town" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "location": "town", "x": 0, "y": 0 }));

    // Move within town.
    let (status, _) = common::post_json(
        &app,
        "/api/v1/players/alice/move",
        &json!({ "x": 3, "y": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, json) = common::get_json(&app, "/api/v1/players/alice").await;
    assert_eq!(json["position"], json!({ "location": "town", "x": 3, "y": 4 }));

    let (_, json) = common::get_json(&app, "/api/v1/locations/town/players").await;
    assert_eq!(
        json,
        json!([{ "username": "alice", "position": { "location": "town", "x": 3, "y": 4 } }])
    );

    // Travel on to the harbor: town's membership set empties and disappears.
    let (status, _) = common::post_json(
        &app,
        "/api/v1/players/alice/travel",
        &json!({ "destination": "harbor" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!store.has_key(&membership_key("town")));
    assert_eq!(store.members(&membership_key("harbor")).len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_player_clears_position_and_membership(pool: PgPool) {
    let (app, store) = common::build_test_app(pool);
    common::post_json(
        &app,
        "/api/v1/players",
        &json!({ "username": "alice", "password": "hunter2" }),
    )
    .await;
    common::post_json(&app, "/api/v1/locations", &json!({ "name": "town" })).await;
    common::post_json(
        &app,
        "/api/v1/players/alice/travel",
        &json!({ "destination": "town" }),
    )
    .await;

    let (status, json) = common::delete(&app, "/api/v1/players/alice").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(json.is_null());
    assert!(!store.has_key(&position_key("alice")));
    assert!(!store.has_key(&membership_key("town")));

    let (status, _) = common::get_json(&app, "/api/v1/players/alice").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_players_is_ordered(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    for name in ["carol", "alice", "bob"] {
        common::post_json(
            &app,
            "/api/v1/players",
            &json!({ "username": name, "password": "pw" }),
        )
        .await;
    }

    let (status, json) = common::get_json(&app, "/api/v1/players").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
}
