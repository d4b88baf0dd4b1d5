//! Domain layer for the Locations context.

pub mod cascade;
pub mod commands;
