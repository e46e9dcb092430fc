//! Member subscriptions to boards, threads or posts
//! (`discussion_board_subscriptions`).

use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `discussion_board_subscriptions` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Subscription {
    pub id: DbId,
    /// References `discussion_board_members.id`.
    pub subscriber_id: DbId,
    pub target_type: String,
    pub target_id: DbId,
    pub notification_method: String,
    pub is_active: bool,
    pub subscribed_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateSubscription {
    pub subscriber_id: DbId,
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub target_type: String,
    pub target_id: DbId,
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub notification_method: String,
    /// Defaults to `true`.
    pub is_active: Option<bool>,
}

/// The subscriber and target are fixed; only delivery preferences change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateSubscription {
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub notification_method: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionSearch {
    pub subscriber_id: Option<DbId>,
    pub target_type: Option<String>,
    pub target_id: Option<DbId>,
    pub notification_method: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for Subscription {
    type Create = CreateSubscription;
    type Update = UpdateSubscription;
    type Search = SubscriptionSearch;

    const ENTITY: &'static str = "subscription";
    const TABLE: &'static str = "discussion_board_subscriptions";
    const PATH: &'static str = "/discussionBoard/member/subscriptions";
    const COLUMNS: &'static str = "\
        id, subscriber_id, target_type, target_id, notification_method, \
        is_active, subscribed_at";
    const UNIQUE: &'static [&'static [&'static str]] =
        &[&["subscriber_id", "target_type", "target_id"]];

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateSubscription, now: Timestamp) -> Self {
        Self {
            id,
            subscriber_id: input.subscriber_id,
            target_type: input.target_type,
            target_id: input.target_id,
            notification_method: input.notification_method,
            is_active: input.is_active.unwrap_or(true),
            subscribed_at: now,
        }
    }

    fn replace(&mut self, input: UpdateSubscription, _now: Timestamp) {
        self.notification_method = input.notification_method;
        self.is_active = input.is_active;
    }

    fn criteria(search: &SubscriptionSearch) -> Criteria {
        Criteria::new()
            .eq("subscriber_id", search.subscriber_id)
            .eq("target_type", search.target_type.as_deref())
            .eq("target_id", search.target_id)
            .eq("notification_method", search.notification_method.as_deref())
            .eq("is_active", search.is_active)
    }

    fn page_request(search: &SubscriptionSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.subscriber_id)
            .push_bind(self.target_type.clone())
            .push_bind(self.target_id)
            .push_bind(self.notification_method.clone())
            .push_bind(self.is_active)
            .push_bind(self.subscribed_at);
    }
}
