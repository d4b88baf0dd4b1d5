//! Outcome of a membership cascade.

use serde::Serialize;
use wayfarer_core::model::LocationRecord;

/// What a rename or delete cascade did to a location's members.
///
/// Cascades are best effort. A member token that cannot be decoded is
/// logged and counted in `skipped`; the rest of the set is still processed.
/// A non-zero `skipped` means some player may still hold a position naming
/// the old location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    /// Members whose position was re-pointed (rename) or removed (delete).
    pub applied: usize,
    /// Members whose token could not be decoded.
    pub skipped: usize,
    /// Members whose live position no longer named the location, either
    /// expired or elsewhere. Their positions were left untouched.
    pub stale: usize,
}

/// Result of `UpdateLocation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationUpdate {
    /// The row after the update.
    pub location: LocationRecord,
    /// How the members were carried over.
    pub cascade: CascadeReport,
}
