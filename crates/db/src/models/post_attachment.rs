//! Files uploaded with a post (`discussion_board_post_attachments`).
//!
//! Addressed below the post: `/discussionBoard/posts/{postId}/attachments`.
//! The file itself lives elsewhere; rows hold its URI and metadata.

use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{ChildResource, Resource, RowBinder};

/// A row from the `discussion_board_post_attachments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PostAttachment {
    pub id: DbId,
    /// References `threads_posts_posts.id`.
    pub post_id: DbId,
    /// References `discussion_board_members.id`.
    pub uploader_id: DbId,
    pub file_uri: String,
    pub file_name: String,
    pub mime_type: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreatePostAttachment {
    pub post_id: DbId,
    pub uploader_id: DbId,
    #[validate(url)]
    pub file_uri: String,
    #[validate(
        length(max = 255),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub file_name: String,
    #[validate(length(min = 3, max = 127))]
    pub mime_type: String,
}

/// Request body of an upload record; the post comes from the path.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct NewPostAttachment {
    pub uploader_id: DbId,
    #[validate(url)]
    pub file_uri: String,
    #[validate(
        length(max = 255),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub file_name: String,
    #[validate(length(min = 3, max = 127))]
    pub mime_type: String,
}

/// Only the display metadata changes; the stored file and uploader do not.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdatePostAttachment {
    #[validate(
        length(max = 255),
        custom(function = "commons_core::validation::non_blank")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[validate(length(min = 3, max = 127))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostAttachmentSearch {
    pub uploader_id: Option<DbId>,
    pub mime_type: Option<String>,
    /// Substring match on the file name.
    pub file_name: Option<String>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for PostAttachment {
    type Create = CreatePostAttachment;
    type Update = UpdatePostAttachment;
    type Search = PostAttachmentSearch;

    const ENTITY: &'static str = "post_attachment";
    const TABLE: &'static str = "discussion_board_post_attachments";
    const PATH: &'static str = "/discussionBoard/posts/{postId}/attachments";
    const COLUMNS: &'static str =
        "id, post_id, uploader_id, file_uri, file_name, mime_type, created_at";

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreatePostAttachment, now: Timestamp) -> Self {
        Self {
            id,
            post_id: input.post_id,
            uploader_id: input.uploader_id,
            file_uri: input.file_uri,
            file_name: input.file_name,
            mime_type: input.mime_type,
            created_at: now,
        }
    }

    fn replace(&mut self, input: UpdatePostAttachment, _now: Timestamp) {
        if let Some(v) = input.file_name {
            self.file_name = v;
        }
        if let Some(v) = input.mime_type {
            self.mime_type = v;
        }
    }

    fn criteria(search: &PostAttachmentSearch) -> Criteria {
        Criteria::new()
            .eq("uploader_id", search.uploader_id)
            .eq("mime_type", search.mime_type.as_deref())
            .contains("file_name", search.file_name.as_deref())
            .since("created_at", search.created_from)
            .until("created_at", search.created_to)
    }

    fn page_request(search: &PostAttachmentSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.post_id)
            .push_bind(self.uploader_id)
            .push_bind(self.file_uri.clone())
            .push_bind(self.file_name.clone())
            .push_bind(self.mime_type.clone())
            .push_bind(self.created_at);
    }
}

impl ChildResource for PostAttachment {
    type Body = NewPostAttachment;

    const PARENT_COLUMN: &'static str = "post_id";

    fn parent_id(&self) -> DbId {
        self.post_id
    }

    fn adopt(parent: DbId, body: NewPostAttachment) -> CreatePostAttachment {
        CreatePostAttachment {
            post_id: parent,
            uploader_id: body.uploader_id,
            file_uri: body.file_uri,
            file_name: body.file_name,
            mime_type: body.mime_type,
        }
    }
}
