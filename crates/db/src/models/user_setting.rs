//! Per-user preferences (`settings_user_settings`), one value per key.

use commons_core::deletion::DeleteReply;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `settings_user_settings` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UserSetting {
    pub id: DbId,
    /// References `discussion_board_members.id`.
    pub user_id: DbId,
    pub setting_key: String,
    pub setting_value: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserSetting {
    pub user_id: DbId,
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub setting_key: String,
    #[validate(length(max = 4000))]
    pub setting_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserSetting {
    #[validate(length(max = 4000))]
    pub setting_value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSettingSearch {
    pub user_id: Option<DbId>,
    pub setting_key: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for UserSetting {
    type Create = CreateUserSetting;
    type Update = UpdateUserSetting;
    type Search = UserSettingSearch;

    const ENTITY: &'static str = "user_setting";
    const TABLE: &'static str = "settings_user_settings";
    const PATH: &'static str = "/settings/userSettings";
    const COLUMNS: &'static str =
        "id, user_id, setting_key, setting_value, created_at, updated_at";
    const UNIQUE: &'static [&'static [&'static str]] = &[&["user_id", "setting_key"]];
    const DELETE_REPLY: DeleteReply = DeleteReply::Entity;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateUserSetting, now: Timestamp) -> Self {
        Self {
            id,
            user_id: input.user_id,
            setting_key: input.setting_key,
            setting_value: input.setting_value,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace(&mut self, input: UpdateUserSetting, now: Timestamp) {
        self.setting_value = input.setting_value;
        self.updated_at = now;
    }

    fn criteria(search: &UserSettingSearch) -> Criteria {
        Criteria::new()
            .eq("user_id", search.user_id)
            .eq("setting_key", search.setting_key.as_deref())
    }

    fn page_request(search: &UserSettingSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.user_id)
            .push_bind(self.setting_key.clone())
            .push_bind(self.setting_value.clone())
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
