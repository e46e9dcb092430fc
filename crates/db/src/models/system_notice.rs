//! Board-wide or per-category notices (`discussion_board_system_notices`).
//!
//! A notice may carry a display window; when both ends are set the window
//! must not be inverted, whichever request set them.

use commons_core::error::CoreError;
use commons_core::nullable;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use commons_core::validation::{check_field, ordered_window};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `discussion_board_system_notices` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SystemNotice {
    pub id: DbId,
    /// References `discussion_board_categories.id`; `None` for global notices.
    pub category_id: Option<DbId>,
    pub title: String,
    pub body: String,
    pub is_active: bool,
    pub start_at: Option<Timestamp>,
    pub end_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateSystemNotice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<DbId>,
    #[validate(
        length(max = 200),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub title: String,
    #[validate(
        length(max = 10_000),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub body: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_at: Option<Timestamp>,
}

/// Absent fields keep their value; `null` clears the category or a window end.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateSystemNotice {
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<Option<DbId>>,
    #[validate(
        length(max = 200),
        custom(function = "commons_core::validation::non_blank")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[validate(
        length(max = 10_000),
        custom(function = "commons_core::validation::non_blank")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_at: Option<Option<Timestamp>>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_at: Option<Option<Timestamp>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemNoticeSearch {
    pub category_id: Option<DbId>,
    /// Substring match on the title.
    pub title: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for SystemNotice {
    type Create = CreateSystemNotice;
    type Update = UpdateSystemNotice;
    type Search = SystemNoticeSearch;

    const ENTITY: &'static str = "system_notice";
    const TABLE: &'static str = "discussion_board_system_notices";
    const PATH: &'static str = "/discussionBoard/member/systemNotices";
    const COLUMNS: &'static str = "\
        id, category_id, title, body, is_active, start_at, end_at, created_at, \
        updated_at";

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateSystemNotice, now: Timestamp) -> Self {
        Self {
            id,
            category_id: input.category_id,
            title: input.title,
            body: input.body,
            is_active: input.is_active,
            start_at: input.start_at,
            end_at: input.end_at,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace(&mut self, input: UpdateSystemNotice, now: Timestamp) {
        nullable::apply(&mut self.category_id, input.category_id);
        if let Some(v) = input.title {
            self.title = v;
        }
        if let Some(v) = input.body {
            self.body = v;
        }
        if let Some(v) = input.is_active {
            self.is_active = v;
        }
        nullable::apply(&mut self.start_at, input.start_at);
        nullable::apply(&mut self.end_at, input.end_at);
        self.updated_at = now;
    }

    fn check_row(&self) -> Result<(), CoreError> {
        match (self.start_at, self.end_at) {
            (Some(start), Some(end)) => check_field("end_at", ordered_window(start, end)),
            _ => Ok(()),
        }
    }

    fn criteria(search: &SystemNoticeSearch) -> Criteria {
        Criteria::new()
            .eq("category_id", search.category_id)
            .contains("title", search.title.as_deref())
            .eq("is_active", search.is_active)
    }

    fn page_request(search: &SystemNoticeSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.category_id)
            .push_bind(self.title.clone())
            .push_bind(self.body.clone())
            .push_bind(self.is_active)
            .push_bind(self.start_at)
            .push_bind(self.end_at)
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
