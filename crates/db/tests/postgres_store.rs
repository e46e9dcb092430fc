//! Integration tests for the generic repository on the Postgres backend.
//!
//! Each test gets a fresh database with every migration applied, so the
//! real indexes and check constraints are in play:
//! - insert and search ordering, paging and filters
//! - `uq_` violations surface as conflicts, `ck_` violations as rejections
//! - soft delete tombstones and frees partial unique keys; hard delete removes
//! - parent-scoped search only sees the parent's rows

use assert_matches::assert_matches;
use chrono::{DateTime, Duration, Utc};
use commons_core::error::CoreError;
use commons_core::pagination::{PageRequest, PageWindow};
use commons_core::types::new_id;
use commons_db::models::category_moderator::AssignCategoryModerator;
use commons_db::models::engagement_stat::{CreateEngagementStat, UpdateEngagementStat};
use commons_db::models::member::{CreateMember, MemberSearch};
use commons_db::models::post_attachment::{NewPostAttachment, PostAttachmentSearch};
use commons_db::models::tag::{CreateTag, TagSearch, UpdateTag};
use commons_db::models::{CategoryModerator, EngagementStat, Member, PostAttachment, Tag};
use commons_db::repositories::ResourceRepo;
use commons_db::{Database, Resource, StoreError};
use sqlx::PgPool;

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

fn new_stat(start: DateTime<Utc>, end: DateTime<Utc>) -> CreateEngagementStat {
    CreateEngagementStat {
        topic_id: None,
        period_start: start,
        period_end: end,
        dimension: "site".to_string(),
        segment_value: "all".to_string(),
        post_count: 10,
        comment_count: 4,
        active_user_count: 3,
        report_count: 0,
    }
}

fn attachment(name: &str) -> NewPostAttachment {
    NewPostAttachment {
        uploader_id: new_id(),
        file_uri: format!("https://files.example.com/{name}"),
        file_name: name.to_string(),
        mime_type: "image/png".to_string(),
    }
}

fn window(page: i64, limit: i64) -> PageWindow {
    PageRequest::new(page, limit).resolve().unwrap()
}

fn day(d: u32) -> DateTime<Utc> {
    format!("2024-05-{d:02}T00:00:00Z").parse().unwrap()
}

// ---------------------------------------------------------------------------
// Insert / search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn insert_then_find_round_trips(pool: PgPool) {
    let db = Database::Postgres(pool);
    let tag = ResourceRepo::create::<Tag>(&db, new_tag("rust")).await.unwrap();

    assert_eq!(tag.name, "rust");
    let found = ResourceRepo::find_by_id::<Tag>(&db, tag.id).await.unwrap();
    assert_eq!(found, Some(tag));
}

#[sqlx::test(migrations = "./migrations")]
async fn search_pages_newest_first(pool: PgPool) {
    let db = Database::Postgres(pool);
    for name in ["a", "b", "c", "d", "e"] {
        ResourceRepo::create::<Tag>(&db, new_tag(name)).await.unwrap();
    }

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

    let beyond = ResourceRepo::search::<Tag>(&db, &TagSearch::default(), window(9, 2))
        .await
        .unwrap();
    assert!(beyond.data.is_empty());
    assert_eq!(beyond.pagination.records, 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn substring_filter_is_case_insensitive_and_literal(pool: PgPool) {
    let db = Database::Postgres(pool);
    for name in ["rust", "Rustacean", "go", "100%_done"] {
        ResourceRepo::create::<Tag>(&db, new_tag(name)).await.unwrap();
    }

    let search = TagSearch {
        name: Some("RUST".into()),
        ..Default::default()
    };
    let page = ResourceRepo::search::<Tag>(&db, &search, window(1, 100))
        .await
        .unwrap();
    assert_eq!(page.pagination.records, 2);

    let search = TagSearch {
        name: Some("%_".into()),
        ..Default::default()
    };
    let page = ResourceRepo::search::<Tag>(&db, &search, window(1, 100))
        .await
        .unwrap();
    assert_eq!(page.pagination.records, 1);
    assert_eq!(page.data[0].name, "100%_done");
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn unique_index_violation_is_a_conflict(pool: PgPool) {
    let db = Database::Postgres(pool);
    ResourceRepo::create::<Tag>(&db, new_tag("rust")).await.unwrap();

    let err = ResourceRepo::create::<Tag>(&db, new_tag("rust"))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Conflict(msg) if msg.contains("uq_categories_tags_tags_name"));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_into_a_taken_name_is_a_conflict(pool: PgPool) {
    let db = Database::Postgres(pool);
    ResourceRepo::create::<Tag>(&db, new_tag("rust")).await.unwrap();
    let go = ResourceRepo::create::<Tag>(&db, new_tag("go")).await.unwrap();

    let err = ResourceRepo::update::<Tag>(
        &db,
        go.id,
        UpdateTag {
            name: "rust".into(),
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, StoreError::Conflict(_));

    let stored = ResourceRepo::find_by_id::<Tag>(&db, go.id).await.unwrap();
    assert_eq!(stored.map(|t| t.name), Some("go".to_string()));
}

#[sqlx::test(migrations = "./migrations")]
async fn composite_unique_key_spans_both_columns(pool: PgPool) {
    let db = Database::Postgres(pool);
    let category = new_id();
    let moderator = new_id();
    let body = || AssignCategoryModerator {
        moderator_id: moderator,
    };

    ResourceRepo::create_in::<CategoryModerator>(&db, category, body())
        .await
        .unwrap();
    ResourceRepo::create_in::<CategoryModerator>(&db, new_id(), body())
        .await
        .unwrap();

    let err = ResourceRepo::create_in::<CategoryModerator>(&db, category, body())
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Conflict(_));
}

#[sqlx::test(migrations = "./migrations")]
async fn check_constraint_violation_is_a_rejection(pool: PgPool) {
    let db = Database::Postgres(pool);
    // Bypasses the repository's row check so the table constraint fires.
    let inverted = EngagementStat::create(new_id(), new_stat(day(2), day(1)), Utc::now());

    let err = db.insert(inverted).await.unwrap_err();
    assert_matches!(
        err,
        StoreError::Rejected(CoreError::Validation(msg))
            if msg.contains("ck_discussion_board_engagement_stats_period")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn update_inverting_a_window_is_rolled_back(pool: PgPool) {
    let db = Database::Postgres(pool);
    let stat = ResourceRepo::create::<EngagementStat>(&db, new_stat(day(1), day(2)))
        .await
        .unwrap();

    let err = ResourceRepo::update::<EngagementStat>(
        &db,
        stat.id,
        UpdateEngagementStat {
            period_end: Some(day(1) - Duration::days(30)),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_matches!(err, StoreError::Rejected(CoreError::Validation(msg)) if msg.starts_with("period_end: "));

    let stored = ResourceRepo::find_by_id::<EngagementStat>(&db, stat.id)
        .await
        .unwrap();
    assert_eq!(stored, Some(stat.clone()));

    let updated = ResourceRepo::update::<EngagementStat>(
        &db,
        stat.id,
        UpdateEngagementStat {
            period_end: Some(day(3)),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.period_end, day(3));
    assert_eq!(updated.period_start, stat.period_start);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn soft_delete_tombstones_and_hides_the_row(pool: PgPool) {
    let db = Database::Postgres(pool);
    let member = ResourceRepo::create::<Member>(&db, new_member("alice"))
        .await
        .unwrap();

    let removed = ResourceRepo::delete::<Member>(&db, member.id)
        .await
        .unwrap()
        .unwrap();
    assert!(removed.deleted_at.is_some());

    let found = ResourceRepo::find_by_id::<Member>(&db, member.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.deleted_at, removed.deleted_at);

    let page = ResourceRepo::search::<Member>(&db, &MemberSearch::default(), window(1, 10))
        .await
        .unwrap();
    assert_eq!(page.pagination.records, 0);

    let again = ResourceRepo::delete::<Member>(&db, member.id).await.unwrap();
    assert!(again.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn soft_deleted_member_frees_its_username(pool: PgPool) {
    let db = Database::Postgres(pool);
    let first = ResourceRepo::create::<Member>(&db, new_member("ferris"))
        .await
        .unwrap();

    let err = ResourceRepo::create::<Member>(&db, new_member("ferris"))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Conflict(_));

    ResourceRepo::delete::<Member>(&db, first.id).await.unwrap();
    let second = ResourceRepo::create::<Member>(&db, new_member("ferris"))
        .await
        .unwrap();
    assert_ne!(second.id, first.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn hard_delete_removes_the_row(pool: PgPool) {
    let db = Database::Postgres(pool);
    let tag = ResourceRepo::create::<Tag>(&db, new_tag("rust")).await.unwrap();

    let removed = ResourceRepo::delete::<Tag>(&db, tag.id).await.unwrap();
    assert_eq!(removed, Some(tag.clone()));

    assert!(ResourceRepo::find_by_id::<Tag>(&db, tag.id)
        .await
        .unwrap()
        .is_none());
    assert!(ResourceRepo::delete::<Tag>(&db, tag.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Below a parent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn parent_scoped_operations_ignore_other_parents(pool: PgPool) {
    let db = Database::Postgres(pool);
    let post = new_id();
    let other = new_id();
    let own = ResourceRepo::create_in::<PostAttachment>(&db, post, attachment("a.png"))
        .await
        .unwrap();
    ResourceRepo::create_in::<PostAttachment>(&db, post, attachment("b.png"))
        .await
        .unwrap();
    let foreign = ResourceRepo::create_in::<PostAttachment>(&db, other, attachment("c.png"))
        .await
        .unwrap();

    let page = ResourceRepo::search_in::<PostAttachment>(
        &db,
        post,
        &PostAttachmentSearch::default(),
        window(1, 10),
    )
    .await
    .unwrap();
    assert_eq!(page.pagination.records, 2);
    assert!(page.data.iter().all(|a| a.post_id == post));

    assert_eq!(
        ResourceRepo::find_in::<PostAttachment>(&db, post, own.id)
            .await
            .unwrap(),
        Some(own)
    );
    assert!(ResourceRepo::find_in::<PostAttachment>(&db, post, foreign.id)
        .await
        .unwrap()
        .is_none());
    assert!(ResourceRepo::delete_in::<PostAttachment>(&db, post, foreign.id)
        .await
        .unwrap()
        .is_none());
    assert!(ResourceRepo::find_by_id::<PostAttachment>(&db, foreign.id)
        .await
        .unwrap()
        .is_some());
}
