//! In-app notifications for board members (`discussion_board_notifications`).

use commons_core::deletion::Removal;
use commons_core::nullable;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `discussion_board_notifications` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct BoardNotification {
    pub id: DbId,
    /// References `discussion_board_members.id`.
    pub recipient_id: DbId,
    /// References `discussion_board_subscriptions.id` when the notification
    /// was produced by a subscription.
    pub subscription_id: Option<DbId>,
    pub notification_type: String,
    pub target_type: String,
    pub target_id: DbId,
    pub message: String,
    pub delivered_at: Timestamp,
    pub read_at: Option<Timestamp>,
    pub delivery_status: String,
    pub failure_reason: Option<String>,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateBoardNotification {
    pub recipient_id: DbId,
    pub subscription_id: Option<DbId>,
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub notification_type: String,
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub target_type: String,
    pub target_id: DbId,
    #[validate(
        length(max = 2000),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub message: String,
    pub delivered_at: Timestamp,
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub delivery_status: String,
    #[validate(length(max = 1000))]
    pub failure_reason: Option<String>,
}

/// Absent fields keep their value; `null` clears `read_at` or `failure_reason`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateBoardNotification {
    #[validate(
        length(max = 2000),
        custom(function = "commons_core::validation::non_blank")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub read_at: Option<Option<Timestamp>>,
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub failure_reason: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardNotificationSearch {
    pub recipient_id: Option<DbId>,
    pub subscription_id: Option<DbId>,
    pub notification_type: Option<String>,
    pub target_type: Option<String>,
    pub target_id: Option<DbId>,
    pub delivery_status: Option<String>,
    /// `true`: only read notifications, `false`: only unread ones.
    pub read: Option<bool>,
    pub delivered_at_from: Option<Timestamp>,
    pub delivered_at_to: Option<Timestamp>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for BoardNotification {
    type Create = CreateBoardNotification;
    type Update = UpdateBoardNotification;
    type Search = BoardNotificationSearch;

    const ENTITY: &'static str = "notification";
    const TABLE: &'static str = "discussion_board_notifications";
    const PATH: &'static str = "/discussionBoard/notifications";
    const COLUMNS: &'static str = "\
        id, recipient_id, subscription_id, notification_type, target_type, \
        target_id, message, delivered_at, read_at, delivery_status, \
        failure_reason, deleted_at";
    const REMOVAL: Removal = Removal::Soft {
        column: "deleted_at",
    };

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateBoardNotification, _now: Timestamp) -> Self {
        Self {
            id,
            recipient_id: input.recipient_id,
            subscription_id: input.subscription_id,
            notification_type: input.notification_type,
            target_type: input.target_type,
            target_id: input.target_id,
            message: input.message,
            delivered_at: input.delivered_at,
            read_at: None,
            delivery_status: input.delivery_status,
            failure_reason: input.failure_reason,
            deleted_at: None,
        }
    }

    fn replace(&mut self, input: UpdateBoardNotification, _now: Timestamp) {
        if let Some(message) = input.message {
            self.message = message;
        }
        if let Some(status) = input.delivery_status {
            self.delivery_status = status;
        }
        nullable::apply(&mut self.read_at, input.read_at);
        nullable::apply(&mut self.failure_reason, input.failure_reason);
    }

    fn removed_at(&self) -> Option<Timestamp> {
        self.deleted_at
    }

    fn mark_removed(&mut self, at: Timestamp) {
        self.deleted_at = Some(at);
    }

    fn criteria(search: &BoardNotificationSearch) -> Criteria {
        Criteria::new()
            .eq("recipient_id", search.recipient_id)
            .eq("subscription_id", search.subscription_id)
            .eq("notification_type", search.notification_type.as_deref())
            .eq("target_type", search.target_type.as_deref())
            .eq("target_id", search.target_id)
            .eq("delivery_status", search.delivery_status.as_deref())
            .present("read_at", search.read)
            .since("delivered_at", search.delivered_at_from)
            .until("delivered_at", search.delivered_at_to)
    }

    fn page_request(search: &BoardNotificationSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.recipient_id)
            .push_bind(self.subscription_id)
            .push_bind(self.notification_type.clone())
            .push_bind(self.target_type.clone())
            .push_bind(self.target_id)
            .push_bind(self.message.clone())
            .push_bind(self.delivered_at)
            .push_bind(self.read_at)
            .push_bind(self.delivery_status.clone())
            .push_bind(self.failure_reason.clone())
            .push_bind(self.deleted_at);
    }
}
