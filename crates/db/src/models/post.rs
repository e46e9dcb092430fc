//! Thread posts (`threads_posts_posts`).

use commons_core::deletion::Removal;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `threads_posts_posts` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: DbId,
    /// References `threads_posts_threads.id`.
    pub thread_id: DbId,
    /// References `discussion_board_members.id`.
    pub author_id: DbId,
    pub title: String,
    pub body: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreatePost {
    pub thread_id: DbId,
    pub author_id: DbId,
    #[validate(
        length(max = 300),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub title: String,
    #[validate(
        length(max = 40000),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdatePost {
    #[validate(
        length(max = 300),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub title: String,
    #[validate(
        length(max = 40000),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostSearch {
    pub thread_id: Option<DbId>,
    pub author_id: Option<DbId>,
    /// Substring match on the title.
    pub title: Option<String>,
    /// Substring match on the body.
    pub body: Option<String>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for Post {
    type Create = CreatePost;
    type Update = UpdatePost;
    type Search = PostSearch;

    const ENTITY: &'static str = "post";
    const TABLE: &'static str = "threads_posts_posts";
    const PATH: &'static str = "/threadsPosts/posts";
    const COLUMNS: &'static str =
        "id, thread_id, author_id, title, body, created_at, updated_at, deleted_at";
    const REMOVAL: Removal = Removal::Soft {
        column: "deleted_at",
    };

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreatePost, now: Timestamp) -> Self {
        Self {
            id,
            thread_id: input.thread_id,
            author_id: input.author_id,
            title: input.title,
            body: input.body,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn replace(&mut self, input: UpdatePost, now: Timestamp) {
        self.title = input.title;
        self.body = input.body;
        self.updated_at = now;
    }

    fn removed_at(&self) -> Option<Timestamp> {
        self.deleted_at
    }

    fn mark_removed(&mut self, at: Timestamp) {
        self.deleted_at = Some(at);
    }

    fn criteria(search: &PostSearch) -> Criteria {
        Criteria::new()
            .eq("thread_id", search.thread_id)
            .eq("author_id", search.author_id)
            .contains("title", search.title.as_deref())
            .contains("body", search.body.as_deref())
            .since("created_at", search.created_from)
            .until("created_at", search.created_to)
    }

    fn page_request(search: &PostSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.thread_id)
            .push_bind(self.author_id)
            .push_bind(self.title.clone())
            .push_bind(self.body.clone())
            .push_bind(self.created_at)
            .push_bind(self.updated_at)
            .push_bind(self.deleted_at);
    }
}
