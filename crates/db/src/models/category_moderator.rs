//! Moderator assignments per category (`discussion_board_category_moderators`).
//!
//! Addressed below the category: `/discussionBoard/admin/categories/{categoryId}/categoryModerators`.

use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{ChildResource, Resource, RowBinder};

/// A row from the `discussion_board_category_moderators` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CategoryModerator {
    pub id: DbId,
    /// References `discussion_board_categories.id`.
    pub category_id: DbId,
    /// References `discussion_board_members.id`.
    pub moderator_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateCategoryModerator {
    pub category_id: DbId,
    pub moderator_id: DbId,
}

/// Request body of an assignment; the category comes from the path.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AssignCategoryModerator {
    pub moderator_id: DbId,
}

/// Reassign the slot to another moderator.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateCategoryModerator {
    pub moderator_id: DbId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryModeratorSearch {
    pub moderator_id: Option<DbId>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for CategoryModerator {
    type Create = CreateCategoryModerator;
    type Update = UpdateCategoryModerator;
    type Search = CategoryModeratorSearch;

    const ENTITY: &'static str = "category_moderator";
    const TABLE: &'static str = "discussion_board_category_moderators";
    const PATH: &'static str = "/discussionBoard/admin/categories/{categoryId}/categoryModerators";
    const COLUMNS: &'static str = "id, category_id, moderator_id, created_at, updated_at";
    const UNIQUE: &'static [&'static [&'static str]] = &[&["category_id", "moderator_id"]];
    const ADMIN_ONLY: bool = true;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateCategoryModerator, now: Timestamp) -> Self {
        Self {
            id,
            category_id: input.category_id,
            moderator_id: input.moderator_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace(&mut self, input: UpdateCategoryModerator, now: Timestamp) {
        self.moderator_id = input.moderator_id;
        self.updated_at = now;
    }

    fn criteria(search: &CategoryModeratorSearch) -> Criteria {
        Criteria::new()
            .eq("moderator_id", search.moderator_id)
            .since("created_at", search.created_from)
            .until("created_at", search.created_to)
    }

    fn page_request(search: &CategoryModeratorSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.category_id)
            .push_bind(self.moderator_id)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}

impl ChildResource for CategoryModerator {
    type Body = AssignCategoryModerator;

    const PARENT_COLUMN: &'static str = "category_id";

    fn parent_id(&self) -> DbId {
        self.category_id
    }

    fn adopt(parent: DbId, body: AssignCategoryModerator) -> CreateCategoryModerator {
        CreateCategoryModerator {
            category_id: parent,
            moderator_id: body.moderator_id,
        }
    }
}
