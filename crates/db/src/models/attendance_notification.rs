//! Attendance event notifications (`attendance_notifications`).
//!
//! Records which attendance event (late, absent, ...) triggered a message to
//! a student's guardians. Delivery itself happens elsewhere.

use commons_core::deletion::DeleteReply;
use commons_core::nullable;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `attendance_notifications` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AttendanceNotification {
    pub id: DbId,
    /// References `attendance_records.id`.
    pub attendance_record_id: DbId,
    /// References `attendance_students.id`.
    pub student_id: DbId,
    /// References `attendance_teachers.id`.
    pub teacher_id: Option<DbId>,
    /// References `attendance_classrooms.id`.
    pub classroom_id: DbId,
    pub event_type: String,
    pub triggered_at: Timestamp,
    pub message_template: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateAttendanceNotification {
    pub attendance_record_id: DbId,
    pub student_id: DbId,
    pub teacher_id: Option<DbId>,
    pub classroom_id: DbId,
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub event_type: String,
    pub triggered_at: Timestamp,
    #[validate(custom(function = "commons_core::validation::non_blank"))]
    pub message_template: String,
}

/// Absent fields keep their value; `teacher_id: null` clears the teacher.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAttendanceNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_record_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<DbId>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub teacher_id: Option<Option<DbId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classroom_id: Option<DbId>,
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggered_at: Option<Timestamp>,
    #[validate(custom(function = "commons_core::validation::non_blank"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_template: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceNotificationSearch {
    pub student_id: Option<DbId>,
    pub classroom_id: Option<DbId>,
    pub event_type: Option<String>,
    pub triggered_from: Option<Timestamp>,
    pub triggered_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for AttendanceNotification {
    type Create = CreateAttendanceNotification;
    type Update = UpdateAttendanceNotification;
    type Search = AttendanceNotificationSearch;

    const ENTITY: &'static str = "attendance_notification";
    const TABLE: &'static str = "attendance_notifications";
    const PATH: &'static str = "/attendance/notifications";
    const COLUMNS: &'static str = "\
        id, attendance_record_id, student_id, teacher_id, classroom_id, \
        event_type, triggered_at, message_template";
    const DELETE_REPLY: DeleteReply = DeleteReply::Confirmation;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateAttendanceNotification, _now: Timestamp) -> Self {
        Self {
            id,
            attendance_record_id: input.attendance_record_id,
            student_id: input.student_id,
            teacher_id: input.teacher_id,
            classroom_id: input.classroom_id,
            event_type: input.event_type,
            triggered_at: input.triggered_at,
            message_template: input.message_template,
        }
    }

    fn replace(&mut self, input: UpdateAttendanceNotification, _now: Timestamp) {
        if let Some(v) = input.attendance_record_id {
            self.attendance_record_id = v;
        }
        if let Some(v) = input.student_id {
            self.student_id = v;
        }
        nullable::apply(&mut self.teacher_id, input.teacher_id);
        if let Some(v) = input.classroom_id {
            self.classroom_id = v;
        }
        if let Some(v) = input.event_type {
            self.event_type = v;
        }
        if let Some(v) = input.triggered_at {
            self.triggered_at = v;
        }
        if let Some(v) = input.message_template {
            self.message_template = v;
        }
    }

    fn criteria(search: &AttendanceNotificationSearch) -> Criteria {
        Criteria::new()
            .eq("student_id", search.student_id)
            .eq("classroom_id", search.classroom_id)
            .eq("event_type", search.event_type.as_deref())
            .since("triggered_at", search.triggered_from)
            .until("triggered_at", search.triggered_to)
    }

    fn page_request(search: &AttendanceNotificationSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.attendance_record_id)
            .push_bind(self.student_id)
            .push_bind(self.teacher_id)
            .push_bind(self.classroom_id)
            .push_bind(self.event_type.clone())
            .push_bind(self.triggered_at)
            .push_bind(self.message_template.clone());
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use commons_core::validation::validate_dto;
    use uuid::Uuid;

    use super::*;

    fn input() -> CreateAttendanceNotification {
        CreateAttendanceNotification {
            attendance_record_id: Uuid::now_v7(),
            student_id: Uuid::now_v7(),
            teacher_id: Some(Uuid::now_v7()),
            classroom_id: Uuid::now_v7(),
            event_type: "absent".into(),
            triggered_at: Utc::now(),
            message_template: "{student} was absent".into(),
        }
    }

    #[test]
    fn event_type_must_be_a_machine_key() {
        let dto = CreateAttendanceNotification {
            event_type: "Left Early".into(),
            ..input()
        };
        assert!(validate_dto(&dto).is_err());
        assert!(validate_dto(&input()).is_ok());
    }

    #[test]
    fn null_teacher_clears_and_absent_teacher_keeps() {
        let mut row = AttendanceNotification::create(Uuid::now_v7(), input(), Utc::now());
        let teacher = row.teacher_id;

        let keep: UpdateAttendanceNotification =
            serde_json::from_value(serde_json::json!({ "event_type": "late" })).unwrap();
        row.replace(keep, Utc::now());
        assert_eq!(row.teacher_id, teacher);
        assert_eq!(row.event_type, "late");

        let clear: UpdateAttendanceNotification =
            serde_json::from_value(serde_json::json!({ "teacher_id": null })).unwrap();
        row.replace(clear, Utc::now());
        assert_eq!(row.teacher_id, None);
    }
}
