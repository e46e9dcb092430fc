//! Aggregated engagement counters per period (`discussion_board_engagement_stats`).

use commons_core::error::CoreError;
use commons_core::nullable;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use commons_core::validation::{check_field, ordered_window};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `discussion_board_engagement_stats` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct EngagementStat {
    pub id: DbId,
    /// References `discussion_board_topics.id`; `None` for board-wide stats.
    pub topic_id: Option<DbId>,
    pub period_start: Timestamp,
    pub period_end: Timestamp,
    pub dimension: String,
    pub segment_value: String,
    pub post_count: i32,
    pub comment_count: i32,
    pub active_user_count: i32,
    pub report_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_create_window"))]
pub struct CreateEngagementStat {
    pub topic_id: Option<DbId>,
    pub period_start: Timestamp,
    pub period_end: Timestamp,
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub dimension: String,
    #[validate(length(min = 1, max = 255))]
    pub segment_value: String,
    #[validate(range(min = 0))]
    pub post_count: i32,
    #[validate(range(min = 0))]
    pub comment_count: i32,
    #[validate(range(min = 0))]
    pub active_user_count: i32,
    #[validate(range(min = 0))]
    pub report_count: i32,
}

/// Absent fields keep their value; `topic_id: null` makes the stat board-wide.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_update_window"))]
pub struct UpdateEngagementStat {
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub topic_id: Option<Option<DbId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<Timestamp>,
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    #[validate(length(min = 1, max = 255))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_value: Option<String>,
    #[validate(range(min = 0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_count: Option<i32>,
    #[validate(range(min = 0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<i32>,
    #[validate(range(min = 0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_user_count: Option<i32>,
    #[validate(range(min = 0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_count: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngagementStatSearch {
    pub topic_id: Option<DbId>,
    /// Lower bound on `period_start`.
    pub period_start_from: Option<Timestamp>,
    /// Upper bound on `period_end`.
    pub period_end_to: Option<Timestamp>,
    pub dimension: Option<String>,
    pub segment_value: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn validate_create_window(input: &CreateEngagementStat) -> Result<(), ValidationError> {
    ordered_window(input.period_start, input.period_end)
}

/// Rejects a body whose own ends are inverted. A single end is checked
/// against the stored row by [`Resource::check_row`].
fn validate_update_window(input: &UpdateEngagementStat) -> Result<(), ValidationError> {
    match (input.period_start, input.period_end) {
        (Some(start), Some(end)) => ordered_window(start, end),
        _ => Ok(()),
    }
}

impl Resource for EngagementStat {
    type Create = CreateEngagementStat;
    type Update = UpdateEngagementStat;
    type Search = EngagementStatSearch;

    const ENTITY: &'static str = "engagement_stat";
    const TABLE: &'static str = "discussion_board_engagement_stats";
    const PATH: &'static str = "/discussionBoard/engagementStats";
    const COLUMNS: &'static str = "\
        id, topic_id, period_start, period_end, dimension, segment_value, \
        post_count, comment_count, active_user_count, report_count";

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateEngagementStat, _now: Timestamp) -> Self {
        Self {
            id,
            topic_id: input.topic_id,
            period_start: input.period_start,
            period_end: input.period_end,
            dimension: input.dimension,
            segment_value: input.segment_value,
            post_count: input.post_count,
            comment_count: input.comment_count,
            active_user_count: input.active_user_count,
            report_count: input.report_count,
        }
    }

    fn replace(&mut self, input: UpdateEngagementStat, _now: Timestamp) {
        nullable::apply(&mut self.topic_id, input.topic_id);
        if let Some(v) = input.period_start {
            self.period_start = v;
        }
        if let Some(v) = input.period_end {
            self.period_end = v;
        }
        if let Some(v) = input.dimension {
            self.dimension = v;
        }
        if let Some(v) = input.segment_value {
            self.segment_value = v;
        }
        if let Some(v) = input.post_count {
            self.post_count = v;
        }
        if let Some(v) = input.comment_count {
            self.comment_count = v;
        }
        if let Some(v) = input.active_user_count {
            self.active_user_count = v;
        }
        if let Some(v) = input.report_count {
            self.report_count = v;
        }
    }

    fn check_row(&self) -> Result<(), CoreError> {
        check_field("period_end", ordered_window(self.period_start, self.period_end))
    }

    fn criteria(search: &EngagementStatSearch) -> Criteria {
        Criteria::new()
            .eq("topic_id", search.topic_id)
            .since("period_start", search.period_start_from)
            .until("period_end", search.period_end_to)
            .eq("dimension", search.dimension.as_deref())
            .eq("segment_value", search.segment_value.as_deref())
    }

    fn page_request(search: &EngagementStatSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.topic_id)
            .push_bind(self.period_start)
            .push_bind(self.period_end)
            .push_bind(self.dimension.clone())
            .push_bind(self.segment_value.clone())
            .push_bind(self.post_count)
            .push_bind(self.comment_count)
            .push_bind(self.active_user_count)
            .push_bind(self.report_count);
    }
}
