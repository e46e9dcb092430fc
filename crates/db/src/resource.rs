//! The `Resource` trait: everything the generic storage, repository, handler
//! and client layers need to know about one table-backed entity.

use commons_core::deletion::{DeleteReply, Removal};
use commons_core::error::CoreError;
use commons_core::pagination::PageRequest;
use commons_core::types::{DbId, Timestamp};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{FromRow, Postgres};
use validator::Validate;

use crate::filter::Criteria;

/// Separated builder handed to [`Resource::bind_row`].
pub type RowBinder<'qb, 'args> = Separated<'qb, 'args, Postgres, &'static str>;

/// A table-backed entity with Create / Update / Search DTOs.
///
/// Implementations are pure declarations: column list, key constraints, delete
/// policy, and the field mapping from DTOs to rows. No I/O happens here.
pub trait Resource:
    for<'r> FromRow<'r, PgRow>
    + Serialize
    + DeserializeOwned
    + Clone
    + Send
    + Sync
    + Unpin
    + 'static
{
    /// Body of `POST /`.
    type Create: DeserializeOwned + Serialize + Validate + Clone + Send + Sync + 'static;
    /// Body of `PUT /{id}`.
    type Update: DeserializeOwned + Serialize + Validate + Clone + Send + Sync + 'static;
    /// Body of `PATCH /`, including `page` and `limit`.
    type Search: DeserializeOwned + Serialize + Default + Clone + Send + Sync + 'static;

    /// Human-readable name used in error messages.
    const ENTITY: &'static str;
    /// Postgres table.
    const TABLE: &'static str;
    /// Route prefix below `/api/v1`. Child resources carry one `{param}`
    /// segment standing for the parent id.
    const PATH: &'static str;
    /// Comma-separated column list, in the order [`bind_row`](Self::bind_row)
    /// pushes values.
    const COLUMNS: &'static str;
    /// Column sets that must be unique among live rows.
    const UNIQUE: &'static [&'static [&'static str]] = &[];
    const REMOVAL: Removal = Removal::Hard;
    const DELETE_REPLY: DeleteReply = DeleteReply::NoContent;
    /// Every operation requires an admin bearer token.
    const ADMIN_ONLY: bool = false;

    fn id(&self) -> DbId;

    /// Build a new row from a validated create DTO.
    fn create(id: DbId, input: Self::Create, now: Timestamp) -> Self;

    /// Apply a validated update DTO in place.
    fn replace(&mut self, input: Self::Update, now: Timestamp);

    /// Invariants spanning several fields of the stored row.
    ///
    /// Runs on every insert and after every update, so a partial update
    /// cannot combine with stored values into an invalid row.
    fn check_row(&self) -> Result<(), CoreError> {
        Ok(())
    }

    /// Tombstone value for soft-delete entities.
    fn removed_at(&self) -> Option<Timestamp> {
        None
    }

    fn mark_removed(&mut self, _at: Timestamp) {}

    fn criteria(search: &Self::Search) -> Criteria;

    fn page_request(search: &Self::Search) -> PageRequest;

    /// Push every column value, in [`COLUMNS`](Self::COLUMNS) order.
    fn bind_row(&self, row: &mut RowBinder<'_, '_>);
}

/// A resource addressed below its parent, e.g.
/// `/discussionBoard/posts/{postId}/attachments`.
///
/// Every operation is confined to rows whose
/// [`PARENT_COLUMN`](Self::PARENT_COLUMN) equals the parent id from the path;
/// rows under another parent are reported as not found. The parent column is
/// never part of the update DTO.
pub trait ChildResource: Resource {
    /// Body of `POST /` below the parent. The parent id comes from the path.
    type Body: DeserializeOwned + Serialize + Validate + Clone + Send + Sync + 'static;

    const PARENT_COLUMN: &'static str;

    fn parent_id(&self) -> DbId;

    /// Complete a request body into a create DTO under `parent`.
    fn adopt(parent: DbId, body: Self::Body) -> Self::Create;
}
