//! Attendance methods (`attendance_methods`): the catalogue of ways a student
//! can be checked in (QR code, NFC, manual, ...).

use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `attendance_methods` table. Carries no timestamps.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AttendanceMethod {
    pub id: DbId,
    pub method_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateAttendanceMethod {
    #[validate(
        length(max = 64),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub method_name: String,
    #[validate(length(max = 1000))]
    pub description: String,
}

/// Absent fields keep their current value.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAttendanceMethod {
    #[validate(
        length(max = 64),
        custom(function = "commons_core::validation::non_blank")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
    #[validate(length(max = 1000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceMethodSearch {
    pub method_name: Option<String>,
    pub description: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for AttendanceMethod {
    type Create = CreateAttendanceMethod;
    type Update = UpdateAttendanceMethod;
    type Search = AttendanceMethodSearch;

    const ENTITY: &'static str = "attendance_method";
    const TABLE: &'static str = "attendance_methods";
    const PATH: &'static str = "/attendance/attendanceMethods";
    const COLUMNS: &'static str = "id, method_name, description";
    const UNIQUE: &'static [&'static [&'static str]] = &[&["method_name"]];

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateAttendanceMethod, _now: Timestamp) -> Self {
        Self {
            id,
            method_name: input.method_name,
            description: input.description,
        }
    }

    fn replace(&mut self, input: UpdateAttendanceMethod, _now: Timestamp) {
        if let Some(method_name) = input.method_name {
            self.method_name = method_name;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
    }

    fn criteria(search: &AttendanceMethodSearch) -> Criteria {
        Criteria::new()
            .contains("method_name", search.method_name.as_deref())
            .contains("description", search.description.as_deref())
    }

    fn page_request(search: &AttendanceMethodSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.method_name.clone())
            .push_bind(self.description.clone());
    }
}
