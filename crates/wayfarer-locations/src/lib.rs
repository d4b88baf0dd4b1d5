//! Wayfarer: Locations context.
//!
//! Responsible for location identity in the durable store and for carrying
//! a location's members along when it is renamed or deleted.

pub mod application;
pub mod domain;
