//! Random instances of response types, served by simulate mode.
//!
//! Values are shaped like real rows: ids are UUIDs, timestamps fall within
//! the last thirty days, and soft-deletable rows come back live.

use chrono::{Duration, Utc};
use commons_core::pagination::{Page, PageWindow};
use commons_core::types::{DbId, Timestamp};
use commons_db::models::{
    Administrator, AttendanceMethod, AttendanceNotification, AuthSession, BoardNotification,
    CategoryModerator, Comment, CommentVersion, Configuration, EngagementStat, Member,
    ModerationLog, Parent, PollVote, Post, PostAttachment, PostEdit, Report, Subscription,
    SystemNotice, Tag, Teacher, ThreadTag, UserSession, UserSetting,
};
use rand::distr::Alphanumeric;
use rand::Rng;

/// A type that can produce a plausible random instance of itself.
pub trait Fixture: Sized {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self;
}

/// A random `T` from the thread-local generator.
pub fn random<T: Fixture>() -> T {
    T::fixture(&mut rand::rng())
}

/// A random page for `window`: the record count is random, and `data` holds
/// exactly as many rows as that count leaves for the window.
pub fn random_page<T: Fixture, G: Rng + ?Sized>(window: PageWindow, rng: &mut G) -> Page<T> {
    let records: u64 = rng.random_range(0..=250);
    let remaining = records.saturating_sub(window.offset());
    let len = remaining.min(u64::from(window.limit));
    let data = (0..len).map(|_| T::fixture(rng)).collect();
    Page::new(window, records, data)
}

// ---------------------------------------------------------------------------
// Field generators
// ---------------------------------------------------------------------------

fn id<G: Rng + ?Sized>(rng: &mut G) -> DbId {
    uuid::Builder::from_random_bytes(rng.random()).into_uuid()
}

fn maybe_id<G: Rng + ?Sized>(rng: &mut G) -> Option<DbId> {
    rng.random_bool(0.5).then(|| id(rng))
}

fn alphanumeric<G: Rng + ?Sized>(rng: &mut G, len: usize) -> String {
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

fn word<G: Rng + ?Sized>(rng: &mut G) -> String {
    let len = rng.random_range(4..12);
    alphanumeric(rng, len).to_ascii_lowercase()
}

fn text<G: Rng + ?Sized>(rng: &mut G) -> String {
    let words = rng.random_range(3..12);
    (0..words).map(|_| word(rng)).collect::<Vec<_>>().join(" ")
}

fn maybe_text<G: Rng + ?Sized>(rng: &mut G) -> Option<String> {
    rng.random_bool(0.5).then(|| text(rng))
}

fn key<G: Rng + ?Sized>(rng: &mut G) -> String {
    format!("{}.{}", word(rng), word(rng))
}

fn email<G: Rng + ?Sized>(rng: &mut G) -> String {
    format!("{}@{}.test", word(rng), word(rng))
}

fn pick<G: Rng + ?Sized>(rng: &mut G, options: &[&str]) -> String {
    options[rng.random_range(0..options.len())].to_string()
}

fn past<G: Rng + ?Sized>(rng: &mut G) -> Timestamp {
    Utc::now() - Duration::seconds(rng.random_range(0..30 * 24 * 3600))
}

fn count<G: Rng + ?Sized>(rng: &mut G) -> i32 {
    rng.random_range(0..10_000)
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

impl Fixture for AuthSession {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let issued_at = past(rng);
        AuthSession {
            id: id(rng),
            auth_account_id: id(rng),
            session_token: alphanumeric(rng, 48),
            user_agent: maybe_text(rng),
            ip_address: Some(format!(
                "10.{}.{}.{}",
                rng.random::<u8>(),
                rng.random::<u8>(),
                rng.random::<u8>()
            )),
            issued_at,
            expires_at: issued_at + Duration::hours(rng.random_range(1..72)),
            revoked_at: None,
        }
    }
}

impl Fixture for AttendanceMethod {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        AttendanceMethod {
            id: id(rng),
            method_name: word(rng),
            description: text(rng),
        }
    }
}

impl Fixture for Parent {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let created_at = past(rng);
        Parent {
            id: id(rng),
            auth_account_id: id(rng),
            name: word(rng),
            email: email(rng),
            phone: format!("555-{:04}", rng.random_range(0..10_000u16)),
            created_at,
            updated_at: created_at,
        }
    }
}

impl Fixture for Teacher {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let created_at = past(rng);
        Teacher {
            id: id(rng),
            school_id: id(rng),
            auth_account_id: id(rng),
            name: word(rng),
            email: email(rng),
            phone: rng
                .random_bool(0.5)
                .then(|| format!("555-{:04}", rng.random_range(0..10_000u16))),
            created_at,
            updated_at: created_at,
        }
    }
}

impl Fixture for AttendanceNotification {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        AttendanceNotification {
            id: id(rng),
            attendance_record_id: id(rng),
            student_id: id(rng),
            teacher_id: maybe_id(rng),
            classroom_id: id(rng),
            event_type: pick(rng, &["absent", "late", "left_early"]),
            triggered_at: past(rng),
            message_template: text(rng),
        }
    }
}

// ---------------------------------------------------------------------------
// Discussion board
// ---------------------------------------------------------------------------

impl Fixture for Member {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let created_at = past(rng);
        Member {
            id: id(rng),
            username: word(rng),
            email: email(rng),
            // Never serialized; left empty like a decoded response.
            hashed_password: String::new(),
            display_name: word(rng),
            profile_image_url: rng
                .random_bool(0.5)
                .then(|| format!("https://img.test/{}.png", word(rng))),
            is_active: rng.random_bool(0.9),
            created_at,
            updated_at: created_at,
            deleted_at: None,
        }
    }
}

impl Fixture for Administrator {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        Administrator {
            id: id(rng),
            member_id: id(rng),
            assigned_at: past(rng),
            revoked_at: None,
        }
    }
}

impl Fixture for Configuration {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let created_at = past(rng);
        Configuration {
            id: id(rng),
            key: key(rng),
            value: word(rng),
            description: maybe_text(rng),
            created_at,
            updated_at: created_at,
        }
    }
}

impl Fixture for ModerationLog {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        ModerationLog {
            id: id(rng),
            actor_member_id: id(rng),
            post_id: maybe_id(rng),
            comment_id: maybe_id(rng),
            action_type: pick(rng, &["hide_post", "delete_comment", "warn_member"]),
            action_details: maybe_text(rng),
            created_at: past(rng),
            deleted_at: None,
        }
    }
}

impl Fixture for UserSession {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let created_at = past(rng);
        UserSession {
            id: id(rng),
            actor_type: pick(rng, &["admin", "moderator", "member", "guest"]),
            actor_identifier: id(rng).to_string(),
            session_token: alphanumeric(rng, 48),
            created_at,
            expires_at: created_at + Duration::hours(rng.random_range(1..72)),
            terminated_at: None,
        }
    }
}

impl Fixture for CategoryModerator {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let created_at = past(rng);
        CategoryModerator {
            id: id(rng),
            category_id: id(rng),
            moderator_id: id(rng),
            created_at,
            updated_at: created_at,
        }
    }
}

impl Fixture for SystemNotice {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let created_at = past(rng);
        let start_at = rng.random_bool(0.5).then(|| past(rng));
        SystemNotice {
            id: id(rng),
            category_id: maybe_id(rng),
            title: text(rng),
            body: text(rng),
            is_active: rng.random_bool(0.8),
            start_at,
            end_at: start_at.map(|s| s + Duration::days(rng.random_range(1..14))),
            created_at,
            updated_at: created_at,
        }
    }
}

impl Fixture for CommentVersion {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        CommentVersion {
            id: id(rng),
            comment_id: id(rng),
            editor_member_id: id(rng),
            content: text(rng),
            created_at: past(rng),
        }
    }
}

impl Fixture for PostAttachment {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let name = word(rng);
        PostAttachment {
            id: id(rng),
            post_id: id(rng),
            uploader_id: id(rng),
            file_uri: format!("https://files.test/{name}.png"),
            file_name: format!("{name}.png"),
            mime_type: "image/png".to_string(),
            created_at: past(rng),
        }
    }
}

impl Fixture for BoardNotification {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let delivered_at = past(rng);
        BoardNotification {
            id: id(rng),
            recipient_id: id(rng),
            subscription_id: maybe_id(rng),
            notification_type: pick(rng, &["reply", "mention", "report"]),
            target_type: pick(rng, &["post", "comment"]),
            target_id: id(rng),
            message: text(rng),
            delivered_at,
            read_at: rng
                .random_bool(0.5)
                .then(|| delivered_at + Duration::minutes(rng.random_range(1..600))),
            delivery_status: pick(rng, &["delivered", "pending"]),
            failure_reason: None,
            deleted_at: None,
        }
    }
}

impl Fixture for Subscription {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        Subscription {
            id: id(rng),
            subscriber_id: id(rng),
            target_type: pick(rng, &["thread", "post", "member"]),
            target_id: id(rng),
            notification_method: pick(rng, &["email", "in_app"]),
            is_active: rng.random_bool(0.8),
            subscribed_at: past(rng),
        }
    }
}

impl Fixture for Report {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let on_post = rng.random_bool(0.5);
        let post = id(rng);
        let comment = id(rng);
        let created_at = past(rng);
        let resolved = rng.random_bool(0.3);
        Report {
            id: id(rng),
            reporter_id: id(rng),
            reported_post_id: on_post.then_some(post),
            reported_comment_id: (!on_post).then_some(comment),
            content_type: if on_post { "post" } else { "comment" }.to_string(),
            reason: text(rng),
            status: if resolved { "resolved" } else { "pending" }.to_string(),
            created_at,
            resolved_at: resolved.then(|| created_at + Duration::hours(1)),
        }
    }
}

impl Fixture for EngagementStat {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let period_start = past(rng);
        EngagementStat {
            id: id(rng),
            topic_id: maybe_id(rng),
            period_start,
            period_end: period_start + Duration::days(1),
            dimension: pick(rng, &["site", "topic", "role"]),
            segment_value: word(rng),
            post_count: count(rng),
            comment_count: count(rng),
            active_user_count: count(rng),
            report_count: count(rng),
        }
    }
}

// ---------------------------------------------------------------------------
// Threads and posts
// ---------------------------------------------------------------------------

impl Fixture for Post {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let created_at = past(rng);
        Post {
            id: id(rng),
            thread_id: id(rng),
            author_id: id(rng),
            title: text(rng),
            body: text(rng),
            created_at,
            updated_at: created_at,
            deleted_at: None,
        }
    }
}

impl Fixture for PostEdit {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        PostEdit {
            id: id(rng),
            post_id: id(rng),
            editor_id: id(rng),
            previous_body: text(rng),
            new_body: text(rng),
            edit_reason: maybe_text(rng),
            created_at: past(rng),
        }
    }
}

impl Fixture for PollVote {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        PollVote {
            id: id(rng),
            poll_id: id(rng),
            poll_option_id: id(rng),
            user_id: id(rng),
            created_at: past(rng),
        }
    }
}

impl Fixture for ThreadTag {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        ThreadTag {
            id: id(rng),
            thread_id: id(rng),
            tag_id: id(rng),
            created_at: past(rng),
        }
    }
}

// ---------------------------------------------------------------------------
// Tags, comments, settings
// ---------------------------------------------------------------------------

impl Fixture for Tag {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let created_at = past(rng);
        Tag {
            id: id(rng),
            name: word(rng),
            description: maybe_text(rng),
            created_at,
            updated_at: created_at,
        }
    }
}

impl Fixture for Comment {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let created_at = past(rng);
        Comment {
            id: id(rng),
            post_id: id(rng),
            author_id: id(rng),
            parent_comment_id: maybe_id(rng),
            body: text(rng),
            created_at,
            updated_at: created_at,
            deleted_at: None,
        }
    }
}

impl Fixture for UserSetting {
    fn fixture<G: Rng + ?Sized>(rng: &mut G) -> Self {
        let created_at = past(rng);
        UserSetting {
            id: id(rng),
            user_id: id(rng),
            setting_key: key(rng),
            setting_value: word(rng),
            created_at,
            updated_at: created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use commons_db::Resource;
    use rand::SeedableRng;

    use super::*;

    fn window(page: u32, limit: u32) -> PageWindow {
        PageWindow { page, limit }
    }

    #[test]
    fn random_page_respects_limit_and_metadata() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let page: Page<Tag> = random_page(window(1, 10), &mut rng);
            assert!(page.data.len() <= 10);
            assert_eq!(
                page.pagination.pages,
                page.pagination.records.div_ceil(10)
            );
        }
    }

    #[test]
    fn random_page_fills_window_from_record_count() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let page: Page<Comment> = random_page(window(3, 20), &mut rng);
            let expected = page.pagination.records.saturating_sub(40).min(20);
            assert_eq!(page.data.len() as u64, expected);
        }
    }

    #[test]
    fn report_fixture_targets_exactly_one_item() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let report = Report::fixture(&mut rng);
            assert!(report.reported_post_id.is_some() != report.reported_comment_id.is_some());
        }
    }

    #[test]
    fn soft_deletable_fixtures_are_live() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(Comment::fixture(&mut rng).deleted_at.is_none());
        assert!(Member::fixture(&mut rng).deleted_at.is_none());
        assert!(AuthSession::fixture(&mut rng).revoked_at.is_none());
    }

    #[test]
    fn time_windows_are_ordered() {
        let mut rng = StdRng::seed_from_u64(9);
        let stat = EngagementStat::fixture(&mut rng);
        assert!(stat.period_end > stat.period_start);
        let session = AuthSession::fixture(&mut rng);
        assert!(session.expires_at > session.issued_at);
        let board_session = UserSession::fixture(&mut rng);
        assert!(board_session.check_row().is_ok());
        for _ in 0..20 {
            assert!(SystemNotice::fixture(&mut rng).check_row().is_ok());
        }
    }

    #[test]
    fn fixtures_serialize_like_rows() {
        let tag: Tag = random();
        let json = serde_json::to_value(&tag).unwrap();
        assert!(json["id"].is_string());
        assert!(json["name"].is_string());
        assert!(json["created_at"].is_string());
    }
}
