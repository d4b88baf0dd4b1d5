//! Shared test fakes and utilities for Wayfarer.

mod clock;
mod ephemeral;
mod repository;

pub use clock::FixedClock;
pub use ephemeral::{FailingEphemeralStore, InMemoryEphemeralStore, StoreOp};
pub use repository::{
    FailingLocationRepository, FailingPlayerRepository, InMemoryLocationRepository,
    InMemoryPlayerRepository,
};
