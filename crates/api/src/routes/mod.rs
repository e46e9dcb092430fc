pub mod health;
pub mod resource;

use axum::Router;
use commons_db::models::{
    Administrator, AttendanceMethod, AttendanceNotification, AuthSession, BoardNotification,
    CategoryModerator, Comment, CommentVersion, Configuration, EngagementStat, Member,
    ModerationLog, Parent, PollVote, Post, PostAttachment, PostEdit, Report, Subscription,
    SystemNotice, Tag, Teacher, ThreadTag, UserSession, UserSetting,
};
use commons_db::{ChildResource, Resource};

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every resource exposes the same route set (see [`resource::router`]);
/// resources below a parent use [`resource::child_router`] and only ever see
/// that parent's rows. Entries marked `admin` require a Bearer token with the
/// `admin` role.
///
/// ```text
/// /attendance/auth/sessions                                  auth sessions
/// /attendance/attendanceMethods                              attendance methods
/// /attendance/parents                                        parents
/// /attendance/teachers                                       teachers
/// /attendance/notifications                                  attendance notifications
///
/// /discussionBoard/members                                   members
/// /discussionBoard/administrators                            administrators (admin)
/// /discussionBoard/configurations                            configurations (admin)
/// /discussionBoard/moderationLogs                            moderation logs (admin)
/// /discussionBoard/admin/userSessions                        user sessions (admin)
/// /discussionBoard/admin/categories/{categoryId}/categoryModerators
///                                                            category moderators (admin)
/// /discussionBoard/notifications                             notifications
/// /discussionBoard/member/subscriptions                      subscriptions
/// /discussionBoard/member/systemNotices                      system notices
/// /discussionBoard/member/comments/{commentId}/versions      comment versions
/// /discussionBoard/posts/{postId}/attachments                post attachments
/// /discussionBoard/reports                                   reports
/// /discussionBoard/engagementStats                           engagement stats
///
/// /threadsPosts/posts                                        posts
/// /threadsPosts/postEdits                                    post edit history
/// /threadsPosts/pollVotes                                    poll votes
/// /threadsPosts/threadTags                                   thread/tag links
///
/// /categoriesTags/tags                                       tags
/// /comments/comments                                         comments
/// /settings/userSettings                                     user settings
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Attendance
        .merge(mount::<AuthSession>())
        .merge(mount::<AttendanceMethod>())
        .merge(mount::<Parent>())
        .merge(mount::<Teacher>())
        .merge(mount::<AttendanceNotification>())
        // Discussion board
        .merge(mount::<Member>())
        .merge(mount::<Administrator>())
        .merge(mount::<Configuration>())
        .merge(mount::<ModerationLog>())
        .merge(mount::<UserSession>())
        .merge(mount_child::<CategoryModerator>())
        .merge(mount::<BoardNotification>())
        .merge(mount::<Subscription>())
        .merge(mount::<SystemNotice>())
        .merge(mount_child::<CommentVersion>())
        .merge(mount_child::<PostAttachment>())
        .merge(mount::<Report>())
        .merge(mount::<EngagementStat>())
        // Threads and posts
        .merge(mount::<Post>())
        .merge(mount::<PostEdit>())
        .merge(mount::<PollVote>())
        .merge(mount::<ThreadTag>())
        // Tags, comments, settings
        .merge(mount::<Tag>())
        .merge(mount::<Comment>())
        .merge(mount::<UserSetting>())
}

fn mount<R: Resource>() -> Router<AppState> {
    Router::new().nest(R::PATH, resource::router::<R>())
}

fn mount_child<R: ChildResource>() -> Router<AppState> {
    Router::new().nest(R::PATH, resource::child_router::<R>())
}
