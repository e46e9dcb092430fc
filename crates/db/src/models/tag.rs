//! Tags (`categories_tags_tags`).

use commons_core::deletion::DeleteReply;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::filter::Criteria;
use crate::resource::{Resource, RowBinder};

/// A row from the `categories_tags_tags` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateTag {
    #[validate(
        length(max = 64),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub name: String,
    #[validate(length(max = 500))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTag {
    #[validate(
        length(max = 64),
        custom(function = "commons_core::validation::non_blank")
    )]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagSearch {
    /// Substring match on the name.
    pub name: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Resource for Tag {
    type Create = CreateTag;
    type Update = UpdateTag;
    type Search = TagSearch;

    const ENTITY: &'static str = "tag";
    const TABLE: &'static str = "categories_tags_tags";
    const PATH: &'static str = "/categoriesTags/tags";
    const COLUMNS: &'static str = "id, name, description, created_at, updated_at";
    const UNIQUE: &'static [&'static [&'static str]] = &[&["name"]];
    const DELETE_REPLY: DeleteReply = DeleteReply::Confirmation;

    fn id(&self) -> DbId {
        self.id
    }

    fn create(id: DbId, input: CreateTag, now: Timestamp) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace(&mut self, input: UpdateTag, now: Timestamp) {
        self.name = input.name;
        self.description = input.description;
        self.updated_at = now;
    }

    fn criteria(search: &TagSearch) -> Criteria {
        Criteria::new().contains("name", search.name.as_deref())
    }

    fn page_request(search: &TagSearch) -> PageRequest {
        PageRequest {
            page: search.page,
            limit: search.limit,
        }
    }

    fn bind_row(&self, row: &mut RowBinder<'_, '_>) {
        row.push_bind(self.id)
            .push_bind(self.name.clone())
            .push_bind(self.description.clone())
            .push_bind(self.created_at)
            .push_bind(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use commons_core::validation::validate_dto;

    use super::*;

    #[test]
    fn description_is_optional_on_create() {
        let dto: CreateTag = serde_json::from_value(serde_json::json!({ "name": "rust" })).unwrap();
        assert_eq!(dto.description, None);
        assert!(validate_dto(&dto).is_ok());
    }

    #[test]
    fn overlong_name_is_rejected() {
        let dto = CreateTag {
            name: "x".repeat(65),
            description: None,
        };
        assert!(validate_dto(&dto).is_err());
    }

    #[test]
    fn update_replaces_the_description() {
        let mut tag = Tag::create(
            uuid::Uuid::now_v7(),
            CreateTag {
                name: "rust".into(),
                description: Some("systems".into()),
            },
            chrono::Utc::now(),
        );
        tag.replace(
            UpdateTag {
                name: "rust".into(),
                description: None,
            },
            chrono::Utc::now(),
        );
        assert_eq!(tag.description, None);
    }
}
