//! Post revision history (`threads_posts_post_edits`).

use commons_core::deletion::DeleteReply;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `threads_posts_post_edits` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PostEdit {
    pub id: DbId,
    /// References `threads_posts_posts.id`.
    pub post_id: DbId,
    /// References `discussion_board_members.id`.
    pub editor_id: DbId,
    pub previous_body: String,
    pub new_body: String,
    pub edit_reason: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreatePostEdit {
    pub post_id: DbId,
    pub editor_id: DbId,
    #[validate(length(max = 40000))]
    pub previous_body: String,
    #[validate(
        length(max = 40000),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub new_body: String,
    #[validate(length(max = 500))]
    pub edit_reason: Option<String>,
}

/// The recorded bodies are history and stay fixed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdatePostEdit {
    #[validate(length(max = 500))]
    pub edit_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostEditSearch {
    pub post_id: Option<DbId>,
    pub editor_id: Option<DbId>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for PostEdit {
    type Create = CreatePostEdit;
    type Update = UpdatePostEdit;
    type Search = PostEditSearch;

    const ENTITY: &'static str = "post_edit";
    const TABLE: &'static str = "threads_posts_post_edits";
    const PATH: &'static str = "/threadsPosts/postEdits";
    const COLUMNS: &'static str =
        "id, post_id, editor_id, previous_body, new_body, edit_reason, created_at";
    const DELETE_REPLY: DeleteReply = DeleteReply::Confirmation;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreatePostEdit, now: Timestamp) -> Self {
        Self {
            id,
            post_id: input.post_id,
            editor_id: input.editor_id,
            previous_body: input.previous_body,
            new_body: input.new_body,
            edit_reason: input.edit_reason,
            created_at: now,
        }
    }

    fn replace(&mut self, input: UpdatePostEdit, _now: Timestamp) {
        self.edit_reason = input.edit_reason;
    }

    fn criteria(search: &PostEditSearch) -> Criteria {
        Criteria::new()
            .eq("post_id", search.post_id)
            .eq("editor_id", search.editor_id)
            .since("created_at", search.created_from)
            .until("created_at", search.created_to)
    }

    fn page_request(search: &PostEditSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.post_id)
            .push_bind(self.editor_id)
            .push_bind(self.previous_body.clone())
            .push_bind(self.new_body.clone())
            .push_bind(self.edit_reason.clone())
            .push_bind(self.created_at);
    }
}
