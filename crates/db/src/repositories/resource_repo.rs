//! Generic CRUD over any [`Resource`].

use chrono::Utc;
use commons_core::deletion::Removal;
use commons_core::pagination::{Page, PageWindow};
use commons_core::types::{new_id, DbId};

use crate::resource::{ChildResource, Resource};
use crate::store::{Database, StoreError};

/// Provides CRUD operations for every registered entity.
pub struct ResourceRepo;

impl ResourceRepo {
    /// Insert a new row built from a validated create DTO.
    pub async fn create<R: Resource>(db: &Database, input: R::Create) -> Result<R, StoreError> {
        let row = R::create(new_id(), input, Utc::now());
        row.check_row()?;
        db.insert(row).await
    }

    /// Find a row by id. Tombstoned rows are returned as-is.
    pub async fn find_by_id<R: Resource>(db: &Database, id: DbId) -> Result<Option<R>, StoreError> {
        db.find(id).await
    }

    /// One page of live rows matching the search filters, newest first.
    pub async fn search<R: Resource>(
        db: &Database,
        search: &R::Search,
        window: PageWindow,
    ) -> Result<Page<R>, StoreError> {
        db.search(&R::criteria(search), window).await
    }

    /// Replace the mutable fields of a live row.
    ///
    /// Returns `None` if the row does not exist or is tombstoned. The merged
    /// row must pass [`Resource::check_row`].
    pub async fn update<R: Resource>(
        db: &Database,
        id: DbId,
        input: R::Update,
    ) -> Result<Option<R>, StoreError> {
        let now = Utc::now();
        db.modify(id, move |row: &mut R| {
            row.replace(input, now);
            row.check_row()?;
            Ok(())
        })
        .await
    }

    /// Delete a row according to the entity's removal policy.
    ///
    /// Soft-delete entities get their tombstone set; others are removed.
    /// Returns the row as it stands after the delete, or `None` if there was
    /// no live row to delete.
    pub async fn delete<R: Resource>(db: &Database, id: DbId) -> Result<Option<R>, StoreError> {
        match R::REMOVAL {
            Removal::Hard => db.remove(id).await,
            Removal::Soft { .. } => {
                let now = Utc::now();
                db.modify(id, move |row: &mut R| {
                    row.mark_removed(now);
                    Ok(())
                })
                .await
            }
        }
    }

    // -- Scoped to a parent ---------------------------------------------------

    /// Insert a row under `parent`.
    pub async fn create_in<R: ChildResource>(
        db: &Database,
        parent: DbId,
        body: R::Body,
    ) -> Result<R, StoreError> {
        Self::create::<R>(db, R::adopt(parent, body)).await
    }

    /// Find a row by id, provided it belongs to `parent`.
    pub async fn find_in<R: ChildResource>(
        db: &Database,
        parent: DbId,
        id: DbId,
    ) -> Result<Option<R>, StoreError> {
        Ok(db
            .find::<R>(id)
            .await?
            .filter(|row| row.parent_id() == parent))
    }

    /// One page of live rows under `parent`.
    pub async fn search_in<R: ChildResource>(
        db: &Database,
        parent: DbId,
        search: &R::Search,
        window: PageWindow,
    ) -> Result<Page<R>, StoreError> {
        let criteria = R::criteria(search).eq(R::PARENT_COLUMN, Some(parent));
        db.search(&criteria, window).await
    }

    /// Update a row under `parent`. Rows under another parent are `None`.
    pub async fn update_in<R: ChildResource>(
        db: &Database,
        parent: DbId,
        id: DbId,
        input: R::Update,
    ) -> Result<Option<R>, StoreError> {
        if Self::find_in::<R>(db, parent, id).await?.is_none() {
            return Ok(None);
        }
        Self::update::<R>(db, id, input).await
    }

    /// Delete a row under `parent`. Rows under another parent are `None`.
    pub async fn delete_in<R: ChildResource>(
        db: &Database,
        parent: DbId,
        id: DbId,
    ) -> Result<Option<R>, StoreError> {
        if Self::find_in::<R>(db, parent, id).await?.is_none() {
            return Ok(None);
        }
        Self::delete::<R>(db, id).await
    }
}
