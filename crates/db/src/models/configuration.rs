//! Board-wide key/value settings (`discussion_board_configurations`).

use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `discussion_board_configurations` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Configuration {
    pub id: DbId,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateConfiguration {
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub key: String,
    #[validate(length(max = 4000))]
    pub value: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateConfiguration {
    #[validate(custom(function = "commons_core::validation::machine_key"))]
    pub key: String,
    #[validate(length(max = 4000))]
    pub value: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigurationSearch {
    pub key: Option<String>,
    pub value: Option<String>,
    pub description: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for Configuration {
    type Create = CreateConfiguration;
    type Update = UpdateConfiguration;
    type Search = ConfigurationSearch;

    const ENTITY: &'static str = "configuration";
    const TABLE: &'static str = "discussion_board_configurations";
    const PATH: &'static str = "/discussionBoard/configurations";
    const COLUMNS: &'static str = "id, key, value, description, created_at, updated_at";
    const UNIQUE: &'static [&'static [&'static str]] = &[&["key"]];
    const ADMIN_ONLY: bool = true;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateConfiguration, now: Timestamp) -> Self {
        Self {
            id,
            key: input.key,
            value: input.value,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace(&mut self, input: UpdateConfiguration, now: Timestamp) {
        self.key = input.key;
        self.value = input.value;
        self.description = input.description;
        self.updated_at = now;
    }

    fn criteria(search: &ConfigurationSearch) -> Criteria {
        Criteria::new()
            .contains("key", search.key.as_deref())
            .contains("value", search.value.as_deref())
            .contains("description", search.description.as_deref())
    }

    fn page_request(search: &ConfigurationSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.key.clone())
            .push_bind(self.value.clone())
            .push_bind(self.description.clone())
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}
