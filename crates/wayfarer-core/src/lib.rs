//! Wayfarer Core: shared types and store seams.
//!
//! Players and locations live in two stores that fail independently: a
//! durable relational store for identity and an ephemeral keyed store for
//! live positions and location membership. This crate defines both seams,
//! the token codec for ephemeral values, and the locks and deadlines that
//! keep multi-step updates across the two stores in order. It contains no
//! infrastructure code.

pub mod clock;
pub mod codec;
pub mod command;
pub mod deadline;
pub mod ephemeral;
pub mod error;
pub mod lock;
pub mod model;
pub mod position;
pub mod repository;
