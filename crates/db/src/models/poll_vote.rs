//! Poll votes (`threads_posts_poll_votes`). One vote per user per poll.

use commons_core::deletion::DeleteReply;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `threads_posts_poll_votes` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PollVote {
    pub id: DbId,
    /// References `threads_posts_polls.id`.
    pub poll_id: DbId,
    /// References `threads_posts_poll_options.id`.
    pub poll_option_id: DbId,
    /// References `discussion_board_members.id`.
    pub user_id: DbId,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreatePollVote {
    pub poll_id: DbId,
    pub poll_option_id: DbId,
    pub user_id: DbId,
}

/// A voter may only switch options within the same poll.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdatePollVote {
    pub poll_option_id: DbId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollVoteSearch {
    pub poll_id: Option<DbId>,
    pub poll_option_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for PollVote {
    type Create = CreatePollVote;
    type Update = UpdatePollVote;
    type Search = PollVoteSearch;

    const ENTITY: &'static str = "poll_vote";
    const TABLE: &'static str = "threads_posts_poll_votes";
    const PATH: &'static str = "/threadsPosts/pollVotes";
    const COLUMNS: &'static str = "id, poll_id, poll_option_id, user_id, created_at";
    const UNIQUE: &'static [&'static [&'static str]] = &[&["poll_id", "user_id"]];
    const DELETE_REPLY: DeleteReply = DeleteReply::Confirmation;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreatePollVote, now: Timestamp) -> Self {
        Self {
            id,
            poll_id: input.poll_id,
            poll_option_id: input.poll_option_id,
            user_id: input.user_id,
            created_at: now,
        }
    }

    fn replace(&mut self, input: UpdatePollVote, _now: Timestamp) {
        self.poll_option_id = input.poll_option_id;
    }

    fn criteria(search: &PollVoteSearch) -> Criteria {
        Criteria::new()
            .eq("poll_id", search.poll_id)
            .eq("poll_option_id", search.poll_option_id)
            .eq("user_id", search.user_id)
    }

    fn page_request(search: &PollVoteSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.poll_id)
            .push_bind(self.poll_option_id)
            .push_bind(self.user_id)
            .push_bind(self.created_at);
    }
}
