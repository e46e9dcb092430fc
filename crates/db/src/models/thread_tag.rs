//! Thread-to-tag links (`threads_posts_thread_tags`).

use commons_core::deletion::DeleteReply;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `threads_posts_thread_tags` junction table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ThreadTag {
    pub id: DbId,
    /// References `threads_posts_threads.id`.
    pub thread_id: DbId,
    /// References `categories_tags_tags.id`.
    pub tag_id: DbId,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateThreadTag {
    pub thread_id: DbId,
    pub tag_id: DbId,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateThreadTag {
    pub thread_id: DbId,
    pub tag_id: DbId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadTagSearch {
    pub thread_id: Option<DbId>,
    pub tag_id: Option<DbId>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for ThreadTag {
    type Create = CreateThreadTag;
    type Update = UpdateThreadTag;
    type Search = ThreadTagSearch;

    const ENTITY: &'static str = "thread_tag";
    const TABLE: &'static str = "threads_posts_thread_tags";
    const PATH: &'static str = "/threadsPosts/threadTags";
    const COLUMNS: &'static str = "id, thread_id, tag_id, created_at";
    const UNIQUE: &'static [&'static [&'static str]] = &[&["thread_id", "tag_id"]];
    const DELETE_REPLY: DeleteReply = DeleteReply::Confirmation;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateThreadTag, now: Timestamp) -> Self {
        Self {
            id,
            thread_id: input.thread_id,
            tag_id: input.tag_id,
            created_at: now,
        }
    }

    fn replace(&mut self, input: UpdateThreadTag, _now: Timestamp) {
        self.thread_id = input.thread_id;
        self.tag_id = input.tag_id;
    }

    fn criteria(search: &ThreadTagSearch) -> Criteria {
        Criteria::new()
            .eq("thread_id", search.thread_id)
            .eq("tag_id", search.tag_id)
            .since("created_at", search.created_from)
            .until("created_at", search.created_to)
    }

    fn page_request(search: &ThreadTagSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.thread_id)
            .push_bind(self.tag_id)
            .push_bind(self.created_at);
    }
}
