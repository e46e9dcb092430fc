//! Content reports filed by members (`discussion_board_reports`).
//!
//! A report targets a post, a comment, or both. New reports start in the
//! `pending` status.

use commons_core::nullable;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// Status assigned to newly filed reports.
pub const INITIAL_REPORT_STATUS: &str = "pending";

/// A row from the `discussion_board_reports` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Report {
    pub id: DbId,
    /// References `discussion_board_members.id`.
    pub reporter_id: DbId,
    /// References `threads_posts_posts.id`.
    pub reported_post_id: Option<DbId>,
    /// References `comments_comments.id`.
    pub reported_comment_id: Option<DbId>,
    pub content_type: String,
    pub reason: String,
    pub status: String,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_report_target"))]
pub struct CreateReport {
    pub reporter_id: DbId,
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub content_type: String,
    pub reported_post_id: Option<DbId>,
    pub reported_comment_id: Option<DbId>,
    #[validate(
        length(max = 2000),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateReport {
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub status: String,
    #[validate(
        length(max = 2000),
        custom(function = "commons_core::validation::non_blank")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub resolved_at: Option<Option<Timestamp>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSearch {
    pub reporter_id: Option<DbId>,
    pub content_type: Option<String>,
    pub reported_post_id: Option<DbId>,
    pub reported_comment_id: Option<DbId>,
    pub reason: Option<String>,
    pub status: Option<String>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn validate_report_target(input: &CreateReport) -> Result<(), ValidationError> {
    if input.reported_post_id.is_none() && input.reported_comment_id.is_none() {
        let mut err = ValidationError::new("report_target");
        err.message = Some("reported_post_id or reported_comment_id is required".into());
        return Err(err);
    }
    Ok(())
}

impl Resource for Report {
    type Create = CreateReport;
    type Update = UpdateReport;
    type Search = ReportSearch;

    const ENTITY: &'static str = "report";
    const TABLE: &'static str = "discussion_board_reports";
    const PATH: &'static str = "/discussionBoard/reports";
    const COLUMNS: &'static str = "\
        id, reporter_id, reported_post_id, reported_comment_id, content_type, \
        reason, status, created_at, resolved_at";

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateReport, now: Timestamp) -> Self {
        Self {
            id,
            reporter_id: input.reporter_id,
            reported_post_id: input.reported_post_id,
            reported_comment_id: input.reported_comment_id,
            content_type: input.content_type,
            reason: input.reason,
            status: INITIAL_REPORT_STATUS.to_string(),
            created_at: now,
            resolved_at: None,
        }
    }

    fn replace(&mut self, input: UpdateReport, _now: Timestamp) {
        self.status = input.status;
        if let Some(reason) = input.reason {
            self.reason = reason;
        }
        nullable::apply(&mut self.resolved_at, input.resolved_at);
    }

    fn criteria(search: &ReportSearch) -> Criteria {
        Criteria::new()
            .eq("reporter_id", search.reporter_id)
            .eq("content_type", search.content_type.as_deref())
            .eq("reported_post_id", search.reported_post_id)
            .eq("reported_comment_id", search.reported_comment_id)
            .contains("reason", search.reason.as_deref())
            .eq("status", search.status.as_deref())
            .since("created_at", search.created_from)
            .until("created_at", search.created_to)
    }

    fn page_request(search: &ReportSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.reporter_id)
            .push_bind(self.reported_post_id)
            .push_bind(self.reported_comment_id)
            .push_bind(self.content_type.clone())
            .push_bind(self.reason.clone())
            .push_bind(self.status.clone())
            .push_bind(self.created_at)
            .push_bind(self.resolved_at);
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use commons_core::error::CoreError;
    use commons_core::validation::validate_dto;
    use uuid::Uuid;

    use super::*;

    fn input(post: Option<DbId>, comment: Option<DbId>) -> CreateReport {
        CreateReport {
            reporter_id: Uuid::now_v7(),
            content_type: "post".into(),
            reported_post_id: post,
            reported_comment_id: comment,
            reason: "spam".into(),
        }
    }

    #[test]
    fn report_needs_a_target() {
        let err = validate_dto(&input(None, None)).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("reported_post_id"));
    }

    #[test]
    fn either_target_is_enough() {
        assert!(validate_dto(&input(Some(Uuid::now_v7()), None)).is_ok());
        assert!(validate_dto(&input(None, Some(Uuid::now_v7()))).is_ok());
    }
}
