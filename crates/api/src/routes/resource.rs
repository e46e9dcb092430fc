use axum::routing::get;
use axum::Router;
use commons_db::{ChildResource, Resource};

use crate::handlers::crud;
use crate::state::AppState;

/// The five-operation route set (plus `GET /`) for one resource.
///
/// ```text
/// GET    /        index (?page=&limit=)
/// POST   /        create
/// PATCH  /        search
/// GET    /{id}    get
/// PUT    /{id}    update
/// DELETE /{id}    delete
/// ```
pub fn router<R: Resource>() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(crud::index::<R>)
                .post(crud::create::<R>)
                .patch(crud::search::<R>),
        )
        .route(
            "/{id}",
            get(crud::get::<R>)
                .put(crud::update::<R>)
                .delete(crud::delete::<R>),
        )
}

/// The same route set for a [`ChildResource`], nested below its parent.
///
/// Handlers read the parent id from the enclosing path segment and confine
/// every operation, including `GET /` and `PATCH /`, to that parent's rows.
pub fn child_router<R: ChildResource>() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(crud::index_in::<R>)
                .post(crud::create_in::<R>)
                .patch(crud::search_in::<R>),
        )
        .route(
            "/{id}",
            get(crud::get_in::<R>)
                .put(crud::update_in::<R>)
                .delete(crud::delete_in::<R>),
        )
}
