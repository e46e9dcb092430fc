//! Per-entity delete conventions.
//!
//! Entities differ in how a delete is carried out (tombstone vs. row removal)
//! and in what the client gets back. Both are declared per entity.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// How a delete is carried out in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The row is removed.
    Hard,
    /// The row stays; `column` receives the deletion timestamp.
    Soft { column: &'static str },
}

impl Removal {
    /// Name of the tombstone column, if any.
    pub fn tombstone_column(&self) -> Option<&'static str> {
        match self {
            Removal::Hard => None,
            Removal::Soft { column } => Some(*column),
        }
    }
}

/// What a successful delete responds with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteReply {
    /// `204 No Content`.
    NoContent,
    /// `200` with the entity as it was removed (or tombstoned).
    Entity,
    /// `200` with a [`DeleteConfirmation`].
    Confirmation,
}

/// Body of a [`DeleteReply::Confirmation`] response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub success: bool,
    #[serde(rename = "deletedId")]
    pub deleted_id: DbId,
}

impl DeleteConfirmation {
    pub fn deleted(id: DbId) -> Self {
        Self {
            success: true,
            deleted_id: id,
        }
    }
}
