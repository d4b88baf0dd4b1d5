//! Wayfarer: durable store.
//!
//! `PostgreSQL` implementations of the player and location repositories.
//! Every query runs under a [`StoreDeadline`](wayfarer_core::deadline::StoreDeadline).

mod error;
pub mod migrations;
pub mod pg_location_repository;
pub mod pg_player_repository;
