//! Domain layer for the Players context.

pub mod commands;
pub mod credentials;
pub mod player;
