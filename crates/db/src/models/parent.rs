//! Parents and guardians (`attendance_parents`).

use commons_core::deletion::DeleteReply;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `attendance_parents` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Parent {
    pub id: DbId,
    /// References `attendance_auth_accounts.id`. One parent per account.
    pub auth_account_id: DbId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateParent {
    pub auth_account_id: DbId,
    #[validate(
        length(max = 100),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 32))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateParent {
    #[validate(
        length(max = 100),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 3, max = 32))]
    pub phone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParentSearch {
    pub auth_account_id: Option<DbId>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for Parent {
    type Create = CreateParent;
    type Update = UpdateParent;
    type Search = ParentSearch;

    const ENTITY: &'static str = "parent";
    const TABLE: &'static str = "attendance_parents";
    const PATH: &'static str = "/attendance/parents";
    const COLUMNS: &'static str =
        "id, auth_account_id, name, email, phone, created_at, updated_at";
    const UNIQUE: &'static [&'static [&'static str]] = &[&["email"], &["auth_account_id"]];
    const DELETE_REPLY: DeleteReply = DeleteReply::Entity;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateParent, now: Timestamp) -> Self {
        Self {
            id,
            auth_account_id: input.auth_account_id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace(&mut self, input: UpdateParent, now: Timestamp) {
        self.name = input.name;
        self.email = input.email;
        self.phone = input.phone;
        self.updated_at = now;
    }

    fn criteria(search: &ParentSearch) -> Criteria {
        Criteria::new()
            .eq("auth_account_id", search.auth_account_id)
            .contains("name", search.name.as_deref())
            .contains("email", search.email.as_deref())
            .eq("phone", search.phone.as_deref())
    }

    fn page_request(search: &ParentSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.auth_account_id)
            .push_bind(self.name.clone())
            .push_bind(self.email.clone())
            .push_bind(self.phone.clone())
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
