//! Discussion board members (`discussion_board_members`).
//!
//! `hashed_password` is accepted on create/update and stored, but never
//! serialized into a response.

use commons_core::deletion::Removal;
use commons_core::nullable;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidateUrl, ValidationError};

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `discussion_board_members` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Member {
    pub id: DbId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub display_name: String,
    pub profile_image_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateMember {
    #[validate(length(min = 3, max = 32), custom(function = "username_chars"))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 255))]
    pub hashed_password: String,
    #[validate(
        length(max = 64),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub display_name: String,
    #[validate(url)]
    pub profile_image_url: Option<String>,
}

/// Full replacement of the member's editable fields. `profile_image_url`
/// may be omitted (kept) or `null` (cleared).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_update_member"))]
pub struct UpdateMember {
    #[validate(length(min = 3, max = 32), custom(function = "username_chars"))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 255))]
    pub hashed_password: String,
    #[validate(
        length(max = 64),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub display_name: String,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_image_url: Option<Option<String>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberSearch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub is_active: Option<bool>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn username_chars(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Ok(());
    }
    let mut err = ValidationError::new("username");
    err.message = Some("may only contain letters, digits, '_', '-' and '.'".into());
    Err(err)
}

fn validate_update_member(input: &UpdateMember) -> Result<(), ValidationError> {
    if let Some(Some(url)) = &input.profile_image_url {
        if !url.validate_url() {
            let mut err = ValidationError::new("url");
            err.message = Some("profile_image_url must be a valid URL".into());
            return Err(err);
        }
    }
    Ok(())
}

impl Resource for Member {
    type Create = CreateMember;
    type Update = UpdateMember;
    type Search = MemberSearch;

    const ENTITY: &'static str = "member";
    const TABLE: &'static str = "discussion_board_members";
    const PATH: &'static str = "/discussionBoard/members";
    const COLUMNS: &'static str = "\
        id, username, email, hashed_password, display_name, profile_image_url, \
        is_active, created_at, updated_at, deleted_at";
    const UNIQUE: &'static [&'static [&'static str]] = &[&["username"], &["email"]];
    const REMOVAL: Removal = Removal::Soft {
        column: "deleted_at",
    };

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateMember, now: Timestamp) -> Self {
        Self {
            id,
            username: input.username,
            email: input.email,
            hashed_password: input.hashed_password,
            display_name: input.display_name,
            profile_image_url: input.profile_image_url,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn replace(&mut self, input: UpdateMember, now: Timestamp) {
        self.username = input.username;
        self.email = input.email;
        self.hashed_password = input.hashed_password;
        self.display_name = input.display_name;
        nullable::apply(&mut self.profile_image_url, input.profile_image_url);
        self.is_active = input.is_active;
        self.updated_at = now;
    }

    fn removed_at(&self) -> Option<Timestamp> {
        self.deleted_at
    }

    fn mark_removed(&mut self, at: Timestamp) {
        self.deleted_at = Some(at);
    }

    fn criteria(search: &MemberSearch) -> Criteria {
        Criteria::new()
            .contains("username", search.username.as_deref())
            .contains("email", search.email.as_deref())
            .contains("display_name", search.display_name.as_deref())
            .eq("is_active", search.is_active)
            .since("created_at", search.created_from)
            .until("created_at", search.created_to)
    }

    fn page_request(search: &MemberSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.username.clone())
            .push_bind(self.email.clone())
            .push_bind(self.hashed_password.clone())
            .push_bind(self.display_name.clone())
            .push_bind(self.profile_image_url.clone())
            .push_bind(self.is_active)
            .push_bind(self.created_at)
            .push_bind(self.updated_at)
            .push_bind(self.deleted_at);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use commons_core::validation::validate_dto;
    use uuid::Uuid;

    use super::*;

    fn create_input() -> CreateMember {
        CreateMember {
            username: "alice".into(),
            email: "alice@example.com".into(),
            hashed_password: "$argon2id$v=19$stub".into(),
            display_name: "Alice".into(),
            profile_image_url: None,
        }
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let member = Member::create(Uuid::nil(), create_input(), Utc::now());
        let json = serde_json::to_value(&member).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn username_rejects_spaces() {
        let input = CreateMember {
            username: "al ice".into(),
            ..create_input()
        };
        assert!(validate_dto(&input).is_err());
    }

    #[test]
    fn update_checks_profile_url_when_set() {
        let update: UpdateMember = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "email": "alice@example.com",
            "hashed_password": "$argon2id$v=19$stub",
            "display_name": "Alice",
            "profile_image_url": "not a url",
            "is_active": true,
        }))
        .unwrap();
        assert!(validate_dto(&update).is_err());
    }

    #[test]
    fn update_null_profile_url_clears_it() {
        let mut member = Member::create(
            Uuid::nil(),
            CreateMember {
                profile_image_url: Some("https://cdn.example.com/a.png".into()),
                ..create_input()
            },
            Utc::now(),
        );
        let update: UpdateMember = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "email": "alice@example.com",
            "hashed_password": "$argon2id$v=19$stub",
            "display_name": "Alice",
            "profile_image_url": null,
            "is_active": false,
        }))
        .unwrap();
        member.replace(update, Utc::now());
        assert_eq!(member.profile_image_url, None);
        assert!(!member.is_active);
    }
}
