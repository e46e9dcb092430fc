//! Integration tests for the generic repository on the in-memory backend.
//!
//! Exercises the storage contract every entity relies on:
//! - create assigns id/timestamps and round-trips through `find_by_id`
//! - search pages newest first and honors filter criteria
//! - soft delete tombstones the row, hides it from search, keeps it readable
//! - hard delete removes the row
//! - unique keys are enforced among live rows only

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use commons_core::pagination::{PageRequest, PageWindow};
use commons_db::models::member::{CreateMember, MemberSearch, UpdateMember};
use commons_db::models::poll_vote::CreatePollVote;
use commons_db::models::tag::{CreateTag, TagSearch, UpdateTag};
use commons_db::models::{Member, PollVote, Tag};
use commons_db::repositories::ResourceRepo;
use commons_db::{Database, StoreError};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_tag(name: &str) -> CreateTag {
    CreateTag {
        name: name.to_string(),
        description: None,
    }
}

fn new_member(username: &str) -> CreateMember {
    CreateMember {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        hashed_password: "$argon2id$v=19$placeholder".to_string(),
        display_name: username.to_uppercase(),
        profile_image_url: None,
    }
}

fn window(page: i64, limit: i64) -> PageWindow {
    PageRequest::new(page, limit).resolve().unwrap()
}

async fn seed_tags(db: &Database, names: &[&str]) -> Vec<Tag> {
    let mut created = Vec::new();
    for name in names {
        created.push(ResourceRepo::create::<Tag>(db, new_tag(name)).await.unwrap());
    }
    created
}

// ---------------------------------------------------------------------------
// Create / find
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_find_returns_identical_row() {
    let db = Database::memory();
    let tag = ResourceRepo::create::<Tag>(&db, new_tag("rust")).await.unwrap();

    assert_eq!(tag.name, "rust");
    assert_eq!(tag.created_at, tag.updated_at);

    let found = ResourceRepo::find_by_id::<Tag>(&db, tag.id).await.unwrap();
    assert_eq!(found, Some(tag));
}

#[tokio::test]
async fn find_unknown_id_is_none() {
    let db = Database::memory();
    let found = ResourceRepo::find_by_id::<Tag>(&db, Uuid::now_v7()).await.unwrap();
    assert!(found.is_none());
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_pages_newest_first() {
    let db = Database::memory();
    seed_tags(&db, &["a", "b", "c", "d", "e"]).await;

    let first = ResourceRepo::search::<Tag>(&db, &TagSearch::default(), window(1, 2))
        .await
        .unwrap();
    let names: Vec<_> = first.data.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["e", "d"]);
    assert_eq!(first.pagination.records, 5);
    assert_eq!(first.pagination.pages, 3);

    let last = ResourceRepo::search::<Tag>(&db, &TagSearch::default(), window(3, 2))
        .await
        .unwrap();
    assert_eq!(last.data.len(), 1);
    assert_eq!(last.data[0].name, "a");
}

#[tokio::test]
async fn search_beyond_last_page_is_empty() {
    let db = Database::memory();
    seed_tags(&db, &["a", "b"]).await;

    let page = ResourceRepo::search::<Tag>(&db, &TagSearch::default(), window(7, 10))
        .await
        .unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.pagination.current, 7);
    assert_eq!(page.pagination.records, 2);
    assert_eq!(page.pagination.pages, 1);
}

#[tokio::test]
async fn search_applies_substring_filter() {
    let db = Database::memory();
    seed_tags(&db, &["rust", "Rustacean", "go"]).await;

    let search = TagSearch {
        name: Some("RUST".into()),
        ..Default::default()
    };
    let page = ResourceRepo::search::<Tag>(&db, &search, window(1, 100))
        .await
        .unwrap();
    assert_eq!(page.pagination.records, 2);
    assert!(page.data.iter().all(|t| t.name.to_lowercase().contains("rust")));
}

#[tokio::test]
async fn search_applies_time_window() {
    let db = Database::memory();
    let before = Utc::now() - Duration::seconds(1);
    ResourceRepo::create::<Member>(&db, new_member("alice")).await.unwrap();

    let future = MemberSearch {
        created_from: Some(Utc::now() + Duration::hours(1)),
        ..Default::default()
    };
    let page = ResourceRepo::search::<Member>(&db, &future, window(1, 10)).await.unwrap();
    assert_eq!(page.pagination.records, 0);

    let recent = MemberSearch {
        created_from: Some(before),
        ..Default::default()
    };
    let page = ResourceRepo::search::<Member>(&db, &recent, window(1, 10)).await.unwrap();
    assert_eq!(page.pagination.records, 1);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_then_find_reflects_update() {
    let db = Database::memory();
    let tag = ResourceRepo::create::<Tag>(&db, new_tag("old")).await.unwrap();

    let update = UpdateTag {
        name: "new".into(),
        description: Some("renamed".into()),
    };
    let updated = ResourceRepo::update::<Tag>(&db, tag.id, update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "new");
    assert_eq!(updated.created_at, tag.created_at);
    assert!(updated.updated_at >= tag.updated_at);

    let found = ResourceRepo::find_by_id::<Tag>(&db, tag.id).await.unwrap();
    assert_eq!(found, Some(updated));
}

#[tokio::test]
async fn update_unknown_id_is_none() {
    let db = Database::memory();
    let update = UpdateTag {
        name: "x".into(),
        description: None,
    };
    let result = ResourceRepo::update::<Tag>(&db, Uuid::now_v7(), update).await.unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hard_delete_removes_row() {
    let db = Database::memory();
    let tag = ResourceRepo::create::<Tag>(&db, new_tag("gone")).await.unwrap();

    let deleted = ResourceRepo::delete::<Tag>(&db, tag.id).await.unwrap();
    assert_eq!(deleted.map(|t| t.id), Some(tag.id));
    assert!(ResourceRepo::find_by_id::<Tag>(&db, tag.id).await.unwrap().is_none());
    assert!(ResourceRepo::delete::<Tag>(&db, tag.id).await.unwrap().is_none());
}

#[tokio::test]
async fn soft_delete_tombstones_and_hides_from_search() {
    let db = Database::memory();
    let member = ResourceRepo::create::<Member>(&db, new_member("bob")).await.unwrap();

    let deleted = ResourceRepo::delete::<Member>(&db, member.id)
        .await
        .unwrap()
        .unwrap();
    assert!(deleted.deleted_at.is_some());

    let found = ResourceRepo::find_by_id::<Member>(&db, member.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.deleted_at, deleted.deleted_at);

    let page = ResourceRepo::search::<Member>(&db, &MemberSearch::default(), window(1, 10))
        .await
        .unwrap();
    assert_eq!(page.pagination.records, 0);

    if let Database::Memory(store) = &db {
        assert_eq!(store.row_count::<Member>().await, 1);
    }
}

#[tokio::test]
async fn tombstoned_row_cannot_be_updated_or_deleted_again() {
    let db = Database::memory();
    let member = ResourceRepo::create::<Member>(&db, new_member("carol")).await.unwrap();
    ResourceRepo::delete::<Member>(&db, member.id).await.unwrap();

    assert!(ResourceRepo::delete::<Member>(&db, member.id).await.unwrap().is_none());

    let update = UpdateMember {
        username: "carol".into(),
        email: "carol@example.com".into(),
        hashed_password: "$argon2id$v=19$placeholder".into(),
        display_name: "Carol".into(),
        profile_image_url: None,
        is_active: true,
    };
    let result = ResourceRepo::update::<Member>(&db, member.id, update).await.unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Uniqueness
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_unique_key_conflicts_on_create() {
    let db = Database::memory();
    ResourceRepo::create::<Tag>(&db, new_tag("dup")).await.unwrap();

    let err = ResourceRepo::create::<Tag>(&db, new_tag("dup")).await.unwrap_err();
    assert_matches!(err, StoreError::Conflict(msg) if msg.contains("name"));
}

#[tokio::test]
async fn duplicate_unique_key_conflicts_on_update() {
    let db = Database::memory();
    let tags = seed_tags(&db, &["one", "two"]).await;

    let update = UpdateTag {
        name: "one".into(),
        description: None,
    };
    let err = ResourceRepo::update::<Tag>(&db, tags[1].id, update).await.unwrap_err();
    assert_matches!(err, StoreError::Conflict(_));
}

#[tokio::test]
async fn updating_a_row_to_its_own_key_is_not_a_conflict() {
    let db = Database::memory();
    let tag = ResourceRepo::create::<Tag>(&db, new_tag("same")).await.unwrap();

    let update = UpdateTag {
        name: "same".into(),
        description: Some("now described".into()),
    };
    assert!(ResourceRepo::update::<Tag>(&db, tag.id, update).await.unwrap().is_some());
}

#[tokio::test]
async fn composite_unique_key_only_conflicts_on_full_match() {
    let db = Database::memory();
    let poll_id = Uuid::now_v7();
    let user_id = Uuid::now_v7();
    let vote = |poll_id, user_id| CreatePollVote {
        poll_id,
        poll_option_id: Uuid::now_v7(),
        user_id,
    };

    ResourceRepo::create::<PollVote>(&db, vote(poll_id, user_id)).await.unwrap();
    ResourceRepo::create::<PollVote>(&db, vote(poll_id, Uuid::now_v7()))
        .await
        .unwrap();
    ResourceRepo::create::<PollVote>(&db, vote(Uuid::now_v7(), user_id))
        .await
        .unwrap();

    let err = ResourceRepo::create::<PollVote>(&db, vote(poll_id, user_id))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Conflict(_));
}

#[tokio::test]
async fn tombstoned_rows_do_not_block_unique_keys() {
    let db = Database::memory();
    let first = ResourceRepo::create::<Member>(&db, new_member("dave")).await.unwrap();
    ResourceRepo::delete::<Member>(&db, first.id).await.unwrap();

    let second = ResourceRepo::create::<Member>(&db, new_member("dave")).await.unwrap();
    assert_ne!(first.id, second.id);
}
