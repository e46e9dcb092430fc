//! Discussion board administrators (`discussion_board_administrators`).
//!
//! An administrator row grants a member admin rights until `revoked_at` is
//! set, either through `PUT` or `DELETE`.

use commons_core::deletion::Removal;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `discussion_board_administrators` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Administrator {
    pub id: DbId,
    /// References `discussion_board_members.id`.
    pub member_id: DbId,
    pub assigned_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateAdministrator {
    pub member_id: DbId,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAdministrator {
    pub revoked_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdministratorSearch {
    pub member_id: Option<DbId>,
    pub assigned_after: Option<Timestamp>,
    pub assigned_before: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for Administrator {
    type Create = CreateAdministrator;
    type Update = UpdateAdministrator;
    type Search = AdministratorSearch;

    const ENTITY: &'static str = "administrator";
    const TABLE: &'static str = "discussion_board_administrators";
    const PATH: &'static str = "/discussionBoard/administrators";
    const COLUMNS: &'static str = "id, member_id, assigned_at, revoked_at";
    const UNIQUE: &'static [&'static [&'static str]] = &[&["member_id"]];
    const REMOVAL: Removal = Removal::Soft {
        column: "revoked_at",
    };
    const ADMIN_ONLY: bool = true;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateAdministrator, now: Timestamp) -> Self {
        Self {
            id,
            member_id: input.member_id,
            assigned_at: now,
            revoked_at: None,
        }
    }

    fn replace(&mut self, input: UpdateAdministrator, _now: Timestamp) {
        self.revoked_at = input.revoked_at;
    }

    fn removed_at(&self) -> Option<Timestamp> {
        self.revoked_at
    }

    fn mark_removed(&mut self, at: Timestamp) {
        self.revoked_at = Some(at);
    }

    fn criteria(search: &AdministratorSearch) -> Criteria {
        Criteria::new()
            .eq("member_id", search.member_id)
            .since("assigned_at", search.assigned_after)
            .until("assigned_at", search.assigned_before)
    }

    fn page_request(search: &AdministratorSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.member_id)
            .push_bind(self.assigned_at)
            .push_bind(self.revoked_at);
    }
}
