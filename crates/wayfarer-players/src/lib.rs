//! Wayfarer: Players context.
//!
//! Responsible for player identity and credentials in the durable store,
//! and for moving players between and within locations in the ephemeral
//! store: Travel, Move and the delete cascade.

pub mod application;
pub mod domain;
