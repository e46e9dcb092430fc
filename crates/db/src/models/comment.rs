//! Post comments (`comments_comments`). Replies point at their parent comment.

use commons_core::deletion::{DeleteReply, Removal};
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `comments_comments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: DbId,
    /// References `threads_posts_posts.id`.
    pub post_id: DbId,
    /// References `discussion_board_members.id`.
    pub author_id: DbId,
    /// References `comments_comments.id`; `None` for top-level comments.
    pub parent_comment_id: Option<DbId>,
    pub body: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateComment {
    pub post_id: DbId,
    pub author_id: DbId,
    pub parent_comment_id: Option<DbId>,
    #[validate(
        length(max = 10000),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateComment {
    #[validate(
        length(max = 10000),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentSearch {
    pub post_id: Option<DbId>,
    pub author_id: Option<DbId>,
    pub parent_comment_id: Option<DbId>,
    /// Substring match on the body.
    pub body: Option<String>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for Comment {
    type Create = CreateComment;
    type Update = UpdateComment;
    type Search = CommentSearch;

    const ENTITY: &'static str = "comment";
    const TABLE: &'static str = "comments_comments";
    const PATH: &'static str = "/comments/comments";
    const COLUMNS: &'static str = "\
        id, post_id, author_id, parent_comment_id, body, created_at, updated_at, \
        deleted_at";
    const REMOVAL: Removal = Removal::Soft {
        column: "deleted_at",
    };
    const DELETE_REPLY: DeleteReply = DeleteReply::Entity;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateComment, now: Timestamp) -> Self {
        Self {
            id,
            post_id: input.post_id,
            author_id: input.author_id,
            parent_comment_id: input.parent_comment_id,
            body: input.body,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn replace(&mut self, input: UpdateComment, now: Timestamp) {
        self.body = input.body;
        self.updated_at = now;
    }

    fn removed_at(&self) -> Option<Timestamp> {
        self.deleted_at
    }

    fn mark_removed(&mut self, at: Timestamp) {
        self.deleted_at = Some(at);
    }

    fn criteria(search: &CommentSearch) -> Criteria {
        Criteria::new()
            .eq("post_id", search.post_id)
            .eq("author_id", search.author_id)
            .eq("parent_comment_id", search.parent_comment_id)
            .contains("body", search.body.as_deref())
            .since("created_at", search.created_from)
            .until("created_at", search.created_to)
    }

    fn page_request(search: &CommentSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.post_id)
            .push_bind(self.author_id)
            .push_bind(self.parent_comment_id)
            .push_bind(self.body.clone())
            .push_bind(self.created_at)
            .push_bind(self.updated_at)
            .push_bind(self.deleted_at);
    }
}
