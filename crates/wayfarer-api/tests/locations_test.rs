//! Integration tests for the Locations bounded context.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use wayfarer_core::ephemeral::{membership_key, position_key};

async fn seed_player_in_town(app: &axum::Router, username: &str, x: i32, y: i32) {
    common::post_json(
        app,
        "/api/v1/players",
        &json!({ "username": username, "password": "pw" }),
    )
    .await;
    common::post_json(
        app,
        &format!("/api/v1/players/{username}/travel"),
        &json!({ "destination": "town" }),
    )
    .await;
    common::post_json(
        app,
        &format!("/api/v1/players/{username}/move"),
        &json!({ "x": x, "y": y }),
    )
    .await;
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_and_get_location_round_trip(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);

    let (status, json) = common::post_json(
        &app,
        "/api/v1/locations",
        &json!({ "name": "town", "x": 10, "y": -5 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], "town");

    let (status, json) = common::get_json(&app, "/api/v1/locations/town").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["x"], 10);
    assert_eq!(json["y"], -5);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_rename_location_carries_players_along(pool: PgPool) {
    // Arrange
    let (app, store) = common::build_test_app(pool);
    common::post_json(&app, "/api/v1/locations", &json!({ "name": "town" })).await;
    seed_player_in_town(&app, "alice", 3, 4).await;
    seed_player_in_town(&app, "bob", 0, 0).await;

    // Act
    let (status, json) = common::patch_json(
        &app,
        "/api/v1/locations/town",
        &json!({ "name": "village", "x": 1, "y": 1 }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["location"]["name"], "village");
    assert_eq!(json["cascade"]["applied"], 2);

    let (_, json) = common::get_json(&app, "/api/v1/players/alice").await;
    assert_eq!(
        json["position"],
        json!({ "location": "village", "x": 3, "y": 4 })
    );

    let (status, json) = common::get_json(&app, "/api/v1/locations/village/players").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);

    assert!(!store.has_key(&membership_key("town")));
    let (status, _) = common::get_json(&app, "/api/v1/locations/town").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_rename_onto_existing_location_returns_409(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);
    for name in ["town", "village"] {
        common::post_json(&app, "/api/v1/locations", &json!({ "name": name })).await;
    }

    let (status, json) = common::patch_json(
        &app,
        "/api/v1/locations/town",
        &json!({ "name": "village", "x": 0, "y": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "duplicate_identity");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_coordinates_keeps_members(pool: PgPool) {
    let (app, store) = common::build_test_app(pool);
    common::post_json(&app, "/api/v1/locations", &json!({ "name": "town" })).await;
    seed_player_in_town(&app, "alice", 3, 4).await;

    let (status, json) = common::patch_json(
        &app,
        "/api/v1/locations/town",
        &json!({ "x": 7, "y": 8 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["location"]["x"], 7);
    assert_eq!(json["cascade"]["applied"], 0);
    assert_eq!(store.members(&membership_key("town")).len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_location_evicts_players(pool: PgPool) {
    let (app, store) = common::build_test_app(pool);
    common::post_json(&app, "/api/v1/locations", &json!({ "name": "town" })).await;
    seed_player_in_town(&app, "alice", 3, 4).await;

    let (status, json) = common::delete(&app, "/api/v1/locations/town").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "applied": 1, "skipped": 0, "stale": 0 }));
    assert!(!store.has_key(&position_key("alice")));
    assert!(!store.has_key(&membership_key("town")));

    // The player row survives; only the position is gone.
    let (status, json) = common::get_json(&app, "/api/v1/players/alice").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["position"].is_null());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_players_in_unknown_location_returns_404(pool: PgPool) {
    let (app, _) = common::build_test_app(pool);

    let (status, json) = common::get_json(&app, "/api/v1/locations/atlantis/players").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_expired_position_drops_out_of_location_listing(pool: PgPool) {
    // Arrange
    let (app, store) = common::build_test_app(pool);
    common::post_json(&app, "/api/v1/locations", &json!({ "name": "town" })).await;
    common::post_json(&app, "/api/v1/locations", &json!({ "name": "village" })).await;
    seed_player_in_town(&app, "alice", 0, 0).await;
    store.expire(&position_key("alice"));
    common::post_json(
        &app,
        "/api/v1/players/alice/travel",
        &json!({ "destination": "village" }),
    )
    .await;

    // Act
    let (status, json) = common::get_json(&app, "/api/v1/locations/town/players").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));
    assert!(!store.has_key(&membership_key("town")));
    assert_eq!(store.members(&membership_key("village")).len(), 1);
}
