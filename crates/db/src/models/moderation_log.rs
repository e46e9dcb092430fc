//! Moderation audit trail (`discussion_board_moderation_logs`).

use commons_core::deletion::{DeleteReply, Removal};
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `discussion_board_moderation_logs` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ModerationLog {
    pub id: DbId,
    /// References `discussion_board_members.id` of the acting moderator.
    pub actor_member_id: DbId,
    /// References `threads_posts_posts.id`.
    pub post_id: Option<DbId>,
    /// References `comments_comments.id`.
    pub comment_id: Option<DbId>,
    pub action_type: String,
    pub action_details: Option<String>,
    pub created_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateModerationLog {
    pub actor_member_id: DbId,
    pub post_id: Option<DbId>,
    pub comment_id: Option<DbId>,
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub action_type: String,
    #[validate(length(max = 4000))]
    pub action_details: Option<String>,
}

/// Only the description of the action can be corrected after the fact.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateModerationLog {
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub action_type: String,
    #[validate(length(max = 4000))]
    pub action_details: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModerationLogSearch {
    pub actor_member_id: Option<DbId>,
    pub post_id: Option<DbId>,
    pub comment_id: Option<DbId>,
    pub action_type: Option<String>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for ModerationLog {
    type Create = CreateModerationLog;
    type Update = UpdateModerationLog;
    type Search = ModerationLogSearch;

    const ENTITY: &'static str = "moderation_log";
    const TABLE: &'static str = "discussion_board_moderation_logs";
    const PATH: &'static str = "/discussionBoard/moderationLogs";
    const COLUMNS: &'static str = "\
        id, actor_member_id, post_id, comment_id, action_type, action_details, \
        created_at, deleted_at";
    const REMOVAL: Removal = Removal::Soft {
        column: "deleted_at",
    };
    const DELETE_REPLY: DeleteReply = DeleteReply::Confirmation;
    const ADMIN_ONLY: bool = true;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateModerationLog, now: Timestamp) -> Self {
        Self {
            id,
            actor_member_id: input.actor_member_id,
            post_id: input.post_id,
            comment_id: input.comment_id,
            action_type: input.action_type,
            action_details: input.action_details,
            created_at: now,
            deleted_at: None,
        }
    }

    fn replace(&mut self, input: UpdateModerationLog, _now: Timestamp) {
        self.action_type = input.action_type;
        self.action_details = input.action_details;
    }

    fn removed_at(&self) -> Option<Timestamp> {
        self.deleted_at
    }

    fn mark_removed(&mut self, at: Timestamp) {
        self.deleted_at = Some(at);
    }

    fn criteria(search: &ModerationLogSearch) -> Criteria {
        Criteria::new()
            .eq("actor_member_id", search.actor_member_id)
            .eq("post_id", search.post_id)
            .eq("comment_id", search.comment_id)
            .eq("action_type", search.action_type.as_deref())
            .since("created_at", search.created_from)
            .until("created_at", search.created_to)
    }

    fn page_request(search: &ModerationLogSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.actor_member_id)
            .push_bind(self.post_id)
            .push_bind(self.comment_id)
            .push_bind(self.action_type.clone())
            .push_bind(self.action_details.clone())
            .push_bind(self.created_at)
            .push_bind(self.deleted_at);
    }
}
