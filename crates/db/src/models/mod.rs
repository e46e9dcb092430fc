//! Entity models and their request DTOs.
//!
//! Each module holds the row struct (`FromRow + Serialize`), its `Create*`,
//! `Update*` and `*Search` DTOs, and the [`Resource`](crate::resource::Resource)
//! declaration that wires them into the generic storage and HTTP layers.

// Attendance
pub mod attendance_method;
pub mod attendance_notification;
pub mod auth_session;
pub mod parent;
pub mod teacher;

// Discussion board
pub mod administrator;
pub mod board_notification;
pub mod category_moderator;
pub mod configuration;
pub mod engagement_stat;
pub mod member;
pub mod moderation_log;
pub mod report;
pub mod subscription;
pub mod system_notice;
pub mod user_session;

// Threads and posts
pub mod poll_vote;
pub mod post;
pub mod post_attachment;
pub mod post_edit;
pub mod thread_tag;

// Categories/tags, comments, settings
pub mod comment;
pub mod comment_version;
pub mod tag;
pub mod user_setting;

pub use administrator::Administrator;
pub use attendance_method::AttendanceMethod;
pub use attendance_notification::AttendanceNotification;
pub use auth_session::AuthSession;
pub use board_notification::BoardNotification;
pub use category_moderator::CategoryModerator;
pub use comment::Comment;
pub use comment_version::CommentVersion;
pub use configuration::Configuration;
pub use engagement_stat::EngagementStat;
pub use member::Member;
pub use moderation_log::ModerationLog;
pub use parent::Parent;
pub use poll_vote::PollVote;
pub use post::Post;
pub use post_attachment::PostAttachment;
pub use post_edit::PostEdit;
pub use report::Report;
pub use subscription::Subscription;
pub use system_notice::SystemNotice;
pub use tag::Tag;
pub use teacher::Teacher;
pub use thread_tag::ThreadTag;
pub use user_session::UserSession;
pub use user_setting::UserSetting;
