//! Generic CRUD handlers.
//!
//! One set of handlers serves every [`Resource`]; [`routes::resource`]
//! instantiates them per entity. Admin-scoped resources are gated by the
//! [`ResourceAccess`] extractor before any body is read.
//!
//! [`routes::resource`]: crate::routes::resource

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use commons_core::deletion::{DeleteConfirmation, DeleteReply};
use commons_core::error::CoreError;
use commons_core::pagination::{Page, PageRequest};
use commons_core::types::DbId;
use commons_core::validation::validate_dto;
use commons_db::repositories::ResourceRepo;
use commons_db::{ChildResource, Resource};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::rbac::ResourceAccess;
use crate::query::PaginationParams;
use crate::state::AppState;

fn not_found<R: Resource>(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: R::ENTITY,
        id,
    })
}

/// POST /
///
/// Validate the create DTO and insert a new row. Returns 201 with the stored
/// entity, including its generated id and timestamps.
pub async fn create<R: Resource>(
    access: ResourceAccess<R>,
    State(state): State<AppState>,
    AppJson(input): AppJson<R::Create>,
) -> AppResult<(StatusCode, Json<R>)> {
    validate_dto(&input)?;

    let row = ResourceRepo::create::<R>(&state.db, input).await?;

    tracing::info!(
        entity = R::ENTITY,
        id = %row.id(),
        admin = ?access.admin.map(|a| a.user_id),
        "Created",
    );

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /?page=&limit=
///
/// Unfiltered page of live rows, newest first.
pub async fn index<R: Resource>(
    _access: ResourceAccess<R>,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Page<R>>> {
    let window = PageRequest::from(params).resolve()?;

    let page = ResourceRepo::search::<R>(&state.db, &R::Search::default(), window).await?;

    Ok(Json(page))
}

/// PATCH /
///
/// Filtered page of live rows. `{}` is an unfiltered first page.
pub async fn search<R: Resource>(
    _access: ResourceAccess<R>,
    State(state): State<AppState>,
    AppJson(search): AppJson<R::Search>,
) -> AppResult<Json<Page<R>>> {
    let window = R::page_request(&search).resolve()?;

    let page = ResourceRepo::search::<R>(&state.db, &search, window).await?;

    tracing::debug!(
        entity = R::ENTITY,
        records = page.pagination.records,
        "Searched"
    );

    Ok(Json(page))
}

/// GET /{id}
///
/// Tombstoned rows of soft-delete entities are returned with their tombstone
/// set.
pub async fn get<R: Resource>(
    _access: ResourceAccess<R>,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<R>> {
    ResourceRepo::find_by_id::<R>(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found::<R>(id))
}

/// PUT /{id}
pub async fn update<R: Resource>(
    access: ResourceAccess<R>,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<R::Update>,
) -> AppResult<Json<R>> {
    validate_dto(&input)?;

    let row = ResourceRepo::update::<R>(&state.db, id, input)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;

    tracing::info!(
        entity = R::ENTITY,
        %id,
        admin = ?access.admin.map(|a| a.user_id),
        "Updated",
    );

    Ok(Json(row))
}

/// DELETE /{id}
///
/// Carries out the entity's removal policy and answers in its declared
/// reply shape: 204, the removed entity, or a `{success, deletedId}`
/// confirmation.
pub async fn delete<R: Resource>(
    access: ResourceAccess<R>,
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Response> {
    let row = ResourceRepo::delete::<R>(&state.db, id)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;

    tracing::info!(
        entity = R::ENTITY,
        %id,
        soft = R::REMOVAL.tombstone_column().is_some(),
        admin = ?access.admin.map(|a| a.user_id),
        "Deleted",
    );

    Ok(delete_reply(row, id))
}

/// Render a removed row in the entity's declared reply shape.
fn delete_reply<R: Resource>(row: R, id: DbId) -> Response {
    match R::DELETE_REPLY {
        DeleteReply::NoContent => StatusCode::NO_CONTENT.into_response(),
        DeleteReply::Entity => Json(row).into_response(),
        DeleteReply::Confirmation => Json(DeleteConfirmation::deleted(id)).into_response(),
    }
}

// ---------------------------------------------------------------------------
// Below a parent
// ---------------------------------------------------------------------------
//
// The first path parameter is the parent id. Rows under another parent are
// answered with 404, exactly like missing rows.

/// POST /
pub async fn create_in<R: ChildResource>(
    access: ResourceAccess<R>,
    State(state): State<AppState>,
    AppPath(parent): AppPath<DbId>,
    AppJson(body): AppJson<R::Body>,
) -> AppResult<(StatusCode, Json<R>)> {
    validate_dto(&body)?;

    let row = ResourceRepo::create_in::<R>(&state.db, parent, body).await?;

    tracing::info!(
        entity = R::ENTITY,
        id = %row.id(),
        %parent,
        admin = ?access.admin.map(|a| a.user_id),
        "Created",
    );

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /?page=&limit=
pub async fn index_in<R: ChildResource>(
    _access: ResourceAccess<R>,
    State(state): State<AppState>,
    AppPath(parent): AppPath<DbId>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Page<R>>> {
    let window = PageRequest::from(params).resolve()?;

    let page =
        ResourceRepo::search_in::<R>(&state.db, parent, &R::Search::default(), window).await?;

    Ok(Json(page))
}

/// PATCH /
pub async fn search_in<R: ChildResource>(
    _access: ResourceAccess<R>,
    State(state): State<AppState>,
    AppPath(parent): AppPath<DbId>,
    AppJson(search): AppJson<R::Search>,
) -> AppResult<Json<Page<R>>> {
    let window = R::page_request(&search).resolve()?;

    let page = ResourceRepo::search_in::<R>(&state.db, parent, &search, window).await?;

    tracing::debug!(
        entity = R::ENTITY,
        %parent,
        records = page.pagination.records,
        "Searched"
    );

    Ok(Json(page))
}

/// GET /{id}
pub async fn get_in<R: ChildResource>(
    _access: ResourceAccess<R>,
    State(state): State<AppState>,
    AppPath((parent, id)): AppPath<(DbId, DbId)>,
) -> AppResult<Json<R>> {
    ResourceRepo::find_in::<R>(&state.db, parent, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found::<R>(id))
}

/// PUT /{id}
pub async fn update_in<R: ChildResource>(
    access: ResourceAccess<R>,
    State(state): State<AppState>,
    AppPath((parent, id)): AppPath<(DbId, DbId)>,
    AppJson(input): AppJson<R::Update>,
) -> AppResult<Json<R>> {
    validate_dto(&input)?;

    let row = ResourceRepo::update_in::<R>(&state.db, parent, id, input)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;

    tracing::info!(
        entity = R::ENTITY,
        %id,
        %parent,
        admin = ?access.admin.map(|a| a.user_id),
        "Updated",
    );

    Ok(Json(row))
}

/// DELETE /{id}
pub async fn delete_in<R: ChildResource>(
    access: ResourceAccess<R>,
    State(state): State<AppState>,
    AppPath((parent, id)): AppPath<(DbId, DbId)>,
) -> AppResult<Response> {
    let row = ResourceRepo::delete_in::<R>(&state.db, parent, id)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;

    tracing::info!(
        entity = R::ENTITY,
        %id,
        %parent,
        admin = ?access.admin.map(|a| a.user_id),
        "Deleted",
    );

    Ok(delete_reply(row, id))
}
