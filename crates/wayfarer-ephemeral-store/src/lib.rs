//! Wayfarer: ephemeral store.
//!
//! Redis implementation of [`EphemeralStore`](wayfarer_core::ephemeral::EphemeralStore).

pub mod redis_ephemeral_store;
