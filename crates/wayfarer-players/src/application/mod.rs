//! Application layer for the Players context.

pub mod command_handlers;
mod locking;
pub mod query_handlers;
