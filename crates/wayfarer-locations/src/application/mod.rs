//! Application layer for the Locations context.

pub mod command_handlers;
pub mod query_handlers;
