//! Attendance login sessions (`attendance_auth_sessions`).
//!
//! A session is revoked rather than deleted: `DELETE` stamps `revoked_at` and
//! the row drops out of listings but stays readable by id.

use commons_core::deletion::Removal;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `attendance_auth_sessions` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AuthSession {
    pub id: DbId,
    /// References `attendance_auth_accounts.id`.
    pub auth_account_id: DbId,
    pub session_token: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateAuthSession {
    pub auth_account_id: DbId,
    #[validate(length(min = 16, max = 512))]
    pub session_token: String,
    #[validate(length(max = 512))]
    pub user_agent: Option<String>,
    #[validate(length(max = 64))]
    pub ip_address: Option<String>,
    pub expires_at: Timestamp,
}

/// The token and owning account are fixed at issue time.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAuthSession {
    #[validate(length(max = 512))]
    pub user_agent: Option<String>,
    #[validate(length(max = 64))]
    pub ip_address: Option<String>,
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSessionSearch {
    pub auth_account_id: Option<DbId>,
    pub ip_address: Option<String>,
    pub issued_from: Option<Timestamp>,
    pub issued_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

impl Resource for AuthSession {
    type Create = CreateAuthSession;
    type Update = UpdateAuthSession;
    type Search = AuthSessionSearch;

    const ENTITY: &'static str = "auth_session";
    const TABLE: &'static str = "attendance_auth_sessions";
    const PATH: &'static str = "/attendance/auth/sessions";
    const COLUMNS: &'static str = "\
        id, auth_account_id, session_token, user_agent, ip_address, \
        issued_at, expires_at, revoked_at";
    const UNIQUE: &'static [&'static [&'static str]] = &[&["session_token"]];
    const REMOVAL: Removal = Removal::Soft {
        column: "revoked_at",
    };

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateAuthSession, now: Timestamp) -> Self {
        Self {
            id,
            auth_account_id: input.auth_account_id,
            session_token: input.session_token,
            user_agent: input.user_agent,
            ip_address: input.ip_address,
            issued_at: now,
            expires_at: input.expires_at,
            revoked_at: None,
        }
    }

    fn replace(&mut self, input: UpdateAuthSession, _now: Timestamp) {
        self.user_agent = input.user_agent;
        self.ip_address = input.ip_address;
        self.expires_at = input.expires_at;
    }

    fn removed_at(&self) -> Option<Timestamp> {
        self.revoked_at
    }

    fn mark_removed(&mut self, at: Timestamp) {
        self.revoked_at = Some(at);
    }

    fn criteria(search: &AuthSessionSearch) -> Criteria {
        Criteria::new()
            .eq("auth_account_id", search.auth_account_id)
            .eq("ip_address", search.ip_address.as_deref())
            .since("issued_at", search.issued_from)
            .until("issued_at", search.issued_to)
    }

    fn page_request(search: &AuthSessionSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.auth_account_id)
            .push_bind(self.session_token.clone())
            .push_bind(self.user_agent.clone())
            .push_bind(self.ip_address.clone())
            .push_bind(self.issued_at)
            .push_bind(self.expires_at)
            .push_bind(self.revoked_at);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use commons_core::validation::validate_dto;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn session_token_and_account_are_immutable() {
        let expires_at = Utc::now() + Duration::hours(1);
        for field in ["session_token", "auth_account_id", "revoked_at"] {
            let mut body = serde_json::json!({ "expires_at": expires_at });
            body[field] = serde_json::json!("tok_0123456789abcdef");
            assert!(
                serde_json::from_value::<UpdateAuthSession>(body).is_err(),
                "{field} was accepted"
            );
        }
    }

    #[test]
    fn short_token_is_rejected() {
        let dto = CreateAuthSession {
            auth_account_id: Uuid::now_v7(),
            session_token: "short".into(),
            user_agent: None,
            ip_address: None,
            expires_at: Utc::now() + Duration::hours(1),
        };
        assert!(validate_dto(&dto).is_err());
    }

    #[test]
    fn revoking_sets_the_tombstone() {
        let now = Utc::now();
        let mut session = AuthSession::create(
            Uuid::now_v7(),
            CreateAuthSession {
                auth_account_id: Uuid::now_v7(),
                session_token: "tok_0123456789abcdef".into(),
                user_agent: Some("curl/8".into()),
                ip_address: None,
                expires_at: now + Duration::hours(1),
            },
            now,
        );
        assert_eq!(session.issued_at, now);
        assert!(session.removed_at().is_none());
        session.mark_removed(now);
        assert_eq!(session.removed_at(), Some(now));
    }
}
