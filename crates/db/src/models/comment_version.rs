//! Edit history of a comment (`discussion_board_comment_versions`).
//!
//! Addressed below the comment: `/discussionBoard/member/comments/{commentId}/versions`.
//! Each row is a full content snapshot.

use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{ChildResource, Resource, RowBinder};

/// A row from the `discussion_board_comment_versions` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CommentVersion {
    pub id: DbId,
    /// References `comments_comments.id`.
    pub comment_id: DbId,
    /// References `discussion_board_members.id`.
    pub editor_member_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentVersion {
    pub comment_id: DbId,
    pub editor_member_id: DbId,
    #[validate(
        length(max = 5000),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewCommentVersion {
    pub editor_member_id: DbId,
    #[validate(
        length(max = 5000),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub content: String,
}

/// Correct a snapshot's content. The editor stays attributed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateCommentVersion {
    #[validate(
        length(max = 5000),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentVersionSearch {
    pub editor_member_id: Option<DbId>,
    /// Substring match on the content.
    pub content: Option<String>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for CommentVersion {
    type Create = CreateCommentVersion;
    type Update = UpdateCommentVersion;
    type Search = CommentVersionSearch;

    const ENTITY: &'static str = "comment_version";
    const TABLE: &'static str = "discussion_board_comment_versions";
    const PATH: &'static str = "/discussionBoard/member/comments/{commentId}/versions";
    const COLUMNS: &'static str = "id, comment_id, editor_member_id, content, created_at";

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateCommentVersion, now: Timestamp) -> Self {
        Self {
            id,
            comment_id: input.comment_id,
            editor_member_id: input.editor_member_id,
            content: input.content,
            created_at: now,
        }
    }

    fn replace(&mut self, input: UpdateCommentVersion, _now: Timestamp) {
        self.content = input.content;
    }

    fn criteria(search: &CommentVersionSearch) -> Criteria {
        Criteria::new()
            .eq("editor_member_id", search.editor_member_id)
            .contains("content", search.content.as_deref())
            .since("created_at", search.created_from)
            .until("created_at", search.created_to)
    }

    fn page_request(search: &CommentVersionSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.comment_id)
            .push_bind(self.editor_member_id)
            .push_bind(self.content.clone())
            .push_bind(self.created_at);
    }
}

impl ChildResource for CommentVersion {
    type Body = NewCommentVersion;

    const PARENT_COLUMN: &'static str = "comment_id";

    fn parent_id(&self) -> DbId {
        self.comment_id
    }

    fn adopt(parent: DbId, body: NewCommentVersion) -> CreateCommentVersion {
        CreateCommentVersion {
            comment_id: parent,
            editor_member_id: body.editor_member_id,
            content: body.content,
        }
    }
}
