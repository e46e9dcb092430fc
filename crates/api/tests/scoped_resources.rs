//! Resources addressed below a parent id, and the flat resources that sit
//! beside them in the discussion board and attendance groups.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    admin_bearer, body_json, create, delete, get, member_bearer, new_id, patch_json, put_json,
    send,
};
use serde_json::json;

fn attachments(post: &str) -> String {
    format!("/api/v1/discussionBoard/posts/{post}/attachments")
}

fn versions(comment: &str) -> String {
    format!("/api/v1/discussionBoard/member/comments/{comment}/versions")
}

fn moderators(category: &str) -> String {
    format!("/api/v1/discussionBoard/admin/categories/{category}/categoryModerators")
}

const TEACHERS: &str = "/api/v1/attendance/teachers";
const NOTICES: &str = "/api/v1/discussionBoard/member/systemNotices";
const SESSIONS: &str = "/api/v1/discussionBoard/admin/userSessions";

fn attachment(name: &str) -> serde_json::Value {
    json!({
        "uploader_id": new_id(),
        "file_uri": format!("https://files.example.com/{name}"),
        "file_name": name,
        "mime_type": "image/png"
    })
}

// ---------------------------------------------------------------------------
// Below a parent
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_takes_the_parent_from_the_path() {
    let app = common::build_test_app();
    let post = new_id();

    let created = create(&app, &attachments(&post), attachment("a.png")).await;
    assert_eq!(created["post_id"], post);

    let id = created["id"].as_str().unwrap();
    let response = get(app, &format!("{}/{id}", attachments(&post))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn create_rejects_a_parent_in_the_body() {
    let app = common::build_test_app();
    let post = new_id();
    let mut body = attachment("a.png");
    body["post_id"] = json!(new_id());

    let response = common::post_json(app, &attachments(&post), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_and_search_only_see_the_parents_rows() {
    let app = common::build_test_app();
    let post = new_id();
    let other = new_id();
    create(&app, &attachments(&post), attachment("a.png")).await;
    create(&app, &attachments(&post), attachment("b.pdf")).await;
    create(&app, &attachments(&other), attachment("c.png")).await;

    let page = body_json(get(app.clone(), &format!("{}?limit=10", attachments(&post))).await).await;
    assert_eq!(page["pagination"]["records"], 2);
    let rows = page["data"].as_array().unwrap();
    assert!(rows.iter().all(|r| r["post_id"] == post));

    let response = patch_json(app.clone(), &attachments(&post), json!({"file_name": "c."})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["pagination"]["records"], 0);

    let response = patch_json(app, &attachments(&other), json!({"file_name": "c."})).await;
    assert_eq!(body_json(response).await["pagination"]["records"], 1);
}

#[tokio::test]
async fn rows_under_another_parent_are_not_found() {
    let app = common::build_test_app();
    let comment = new_id();
    let other = new_id();
    let created = create(
        &app,
        &versions(&comment),
        json!({"editor_member_id": new_id(), "content": "first draft"}),
    )
    .await;
    let id = created["id"].as_str().unwrap();
    let foreign = format!("{}/{id}", versions(&other));

    assert_eq!(get(app.clone(), &foreign).await.status(), StatusCode::NOT_FOUND);
    let response = put_json(app.clone(), &foreign, json!({"content": "hijacked"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete(app.clone(), &foreign).await.status(), StatusCode::NOT_FOUND);

    let own = format!("{}/{id}", versions(&comment));
    let stored = body_json(get(app.clone(), &own).await).await;
    assert_eq!(stored["content"], "first draft");

    let response = put_json(app.clone(), &own, json!({"content": "second draft"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(delete(app.clone(), &own).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(get(app, &own).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_parent_id_returns_400() {
    let app = common::build_test_app();
    let response = get(app, &attachments("not-a-uuid")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn category_moderators_require_admin() {
    let app = common::build_test_app();
    let category = new_id();
    let body = json!({"moderator_id": new_id()});

    let response = send(
        app.clone(),
        Method::POST,
        &moderators(&category),
        Some(body.clone()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let member = member_bearer();
    let response = send(
        app.clone(),
        Method::GET,
        &moderators(&category),
        None,
        Some(&member),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = admin_bearer();
    let response = send(
        app.clone(),
        Method::POST,
        &moderators(&category),
        Some(body.clone()),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["category_id"], category);

    let response = send(
        app,
        Method::POST,
        &moderators(&category),
        Some(body),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Flat resources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn teacher_delete_replies_with_the_entity() {
    let app = common::build_test_app();
    let created = create(
        &app,
        TEACHERS,
        json!({
            "school_id": new_id(),
            "auth_account_id": new_id(),
            "name": "Ada",
            "email": "ada@school.test",
            "phone": "555-0100"
        }),
    )
    .await;
    let uri = format!("{TEACHERS}/{}", created["id"].as_str().unwrap());

    let response = put_json(
        app.clone(),
        &uri,
        json!({
            "school_id": created["school_id"],
            "auth_account_id": created["auth_account_id"],
            "name": "Ada L.",
            "email": "ada@school.test",
            "phone": null
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert!(updated["phone"].is_null());

    let response = delete(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Ada L.");
    assert_eq!(get(app, &uri).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn system_notice_window_cannot_be_inverted_by_a_partial_update() {
    let app = common::build_test_app();
    let created = create(
        &app,
        NOTICES,
        json!({
            "title": "Maintenance",
            "body": "Read-only tonight.",
            "is_active": true,
            "start_at": "2024-06-01T20:00:00Z",
            "end_at": "2024-06-01T23:00:00Z"
        }),
    )
    .await;
    let uri = format!("{NOTICES}/{}", created["id"].as_str().unwrap());

    let response = put_json(app.clone(), &uri, json!({"end_at": "2024-06-01T19:00:00Z"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json(app, &uri, json!({"end_at": null})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["end_at"].is_null());
}

#[tokio::test]
async fn user_sessions_are_admin_scoped_and_unique_by_token() {
    let app = common::build_test_app();
    let body = json!({
        "actor_type": "member",
        "actor_identifier": new_id(),
        "session_token": "tok_0123456789abcdef",
        "expires_at": "2099-01-01T00:00:00Z"
    });

    let response = send(app.clone(), Method::POST, SESSIONS, Some(body.clone()), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let admin = admin_bearer();
    let response = send(
        app.clone(),
        Method::POST,
        SESSIONS,
        Some(body.clone()),
        Some(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert!(created["terminated_at"].is_null());

    let response = send(app, Method::POST, SESSIONS, Some(body), Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
