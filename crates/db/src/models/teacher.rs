//! Teachers (`attendance_teachers`).

use commons_core::deletion::DeleteReply;
use commons_core::nullable;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `attendance_teachers` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Teacher {
    pub id: DbId,
    /// References `attendance_schools.id`.
    pub school_id: DbId,
    /// References `attendance_auth_accounts.id`.
    pub auth_account_id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateTeacher {
    pub school_id: DbId,
    pub auth_account_id: DbId,
    #[validate(
        length(max = 100),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 32))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Full replacement of the teacher's record. `phone` may be omitted (kept)
/// or `null` (cleared).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_update_phone"))]
pub struct UpdateTeacher {
    pub school_id: DbId,
    pub auth_account_id: DbId,
    #[validate(
        length(max = 100),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeacherSearch {
    pub school_id: Option<DbId>,
    /// Substring match on the name.
    pub name: Option<String>,
    /// Substring match on the e-mail address.
    pub email: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

fn validate_update_phone(input: &UpdateTeacher) -> Result<(), ValidationError> {
    if let Some(Some(phone)) = &input.phone {
        if !(3..=32).contains(&phone.chars().count()) {
            let mut err = ValidationError::new("length");
            err.message = Some("phone must be 3 to 32 characters".into());
            return Err(err);
        }
    }
    Ok(())
}

impl Resource for Teacher {
    type Create = CreateTeacher;
    type Update = UpdateTeacher;
    type Search = TeacherSearch;

    const ENTITY: &'static str = "teacher";
    const TABLE: &'static str = "attendance_teachers";
    const PATH: &'static str = "/attendance/teachers";
    const COLUMNS: &'static str =
        "id, school_id, auth_account_id, name, email, phone, created_at, updated_at";
    const UNIQUE: &'static [&'static [&'static str]] = &[&["email"]];
    const DELETE_REPLY: DeleteReply = DeleteReply::Entity;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateTeacher, now: Timestamp) -> Self {
        Self {
            id,
            school_id: input.school_id,
            auth_account_id: input.auth_account_id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace(&mut self, input: UpdateTeacher, now: Timestamp) {
        self.school_id = input.school_id;
        self.auth_account_id = input.auth_account_id;
        self.name = input.name;
        self.email = input.email;
        nullable::apply(&mut self.phone, input.phone);
        self.updated_at = now;
    }

    fn criteria(search: &TeacherSearch) -> Criteria {
        Criteria::new()
            .eq("school_id", search.school_id)
            .contains("name", search.name.as_deref())
            .contains("email", search.email.as_deref())
    }

    fn page_request(search: &TeacherSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.school_id)
            .push_bind(self.auth_account_id)
            .push_bind(self.name.clone())
            .push_bind(self.email.clone())
            .push_bind(self.phone.clone())
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
