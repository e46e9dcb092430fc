//! Board session records for every actor kind (`discussion_board_user_sessions`).
//!
//! Admin-scoped. The actor identity and token are fixed at creation; only the
//! expiry and termination time change afterwards.

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

/// Accepted values of `actor_type`.
pub const ACTOR_TYPES: &[&str] = &["admin", "moderator", "member", "guest"];

/// A row from the `discussion_board_user_sessions` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UserSession {
    pub id: DbId,
    pub actor_type: String,
    /// Member id, administrator id or guest fingerprint, depending on
    /// `actor_type`.
    pub actor_identifier: String,
    pub session_token: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub terminated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserSession {
    #[validate(custom(function = "actor_type"))]
    pub actor_type: String,
    #[validate(
        length(max = 255),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub actor_identifier: String,
    #[validate(length(min = 16, max = 512))]
    pub session_token: String,
    pub expires_at: Timestamp,
}

/// `terminated_at: null` reopens a session that was ended by mistake.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub terminated_at: Option<Option<Timestamp>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSessionSearch {
    pub actor_type: Option<String>,
    pub actor_identifier: Option<String>,
    /// `true`: only terminated sessions. `false`: only open ones.
    pub terminated: Option<bool>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn actor_type(value: &str) -> Result<(), ValidationError> {
    if !ACTOR_TYPES.contains(&value) {
        let mut err = ValidationError::new("actor_type");
        err.message = Some("must be one of admin, moderator, member, guest".into());
        return Err(err);
    }
    Ok(())
}

impl Resource for UserSession {
    type Create = CreateUserSession;
    type Update = UpdateUserSession;
    type Search = UserSessionSearch;

    const ENTITY: &'static str = "user_session";
    const TABLE: &'static str = "discussion_board_user_sessions";
    const PATH: &'static str = "/discussionBoard/admin/userSessions";
    const COLUMNS: &'static str = "\
        id, actor_type, actor_identifier, session_token, created_at, expires_at, \
        terminated_at";
    const UNIQUE: &'static [&'static [&'static str]] = &[&["session_token"]];
    const ADMIN_ONLY: bool = true;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateUserSession, now: Timestamp) -> Self {
        Self {
            id,
            actor_type: input.actor_type,
            actor_identifier: input.actor_identifier,
            session_token: input.session_token,
            created_at: now,
            expires_at: input.expires_at,
            terminated_at: None,
        }
    }

    fn replace(&mut self, input: UpdateUserSession, _now: Timestamp) {
        if let Some(v) = input.expires_at {
            self.expires_at = v;
        }
        nullable::apply(&mut self.terminated_at, input.terminated_at);
    }

    fn check_row(&self) -> Result<(), CoreError> {
        check_field("expires_at", ordered_window(self.created_at, self.expires_at))
    }

    fn criteria(search: &UserSessionSearch) -> Criteria {
        Criteria::new()
            .eq("actor_type", search.actor_type.as_deref())
            .eq("actor_identifier", search.actor_identifier.as_deref())
            .present("terminated_at", search.terminated)
            .since("created_at", search.created_from)
            .until("created_at", search.created_to)
    }

    fn page_request(search: &UserSessionSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.actor_type.clone())
            .push_bind(self.actor_identifier.clone())
            .push_bind(self.session_token.clone())
            .push_bind(self.created_at)
            .push_bind(self.expires_at)
            .push_bind(self.terminated_at);
    }
}
