//! In-memory backend.
//!
//! One typed `BTreeMap` per resource, keyed by id. UUID v7 ids sort by
//! creation time, so iterating a table in reverse yields newest first, matching
//! the `ORDER BY id DESC` of the Postgres backend.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};

use commons_core::pagination::{Page, PageWindow};
use commons_core::types::DbId;
use serde_json::Value;
use tokio::sync::RwLock;

use super::StoreError;
use crate::filter::Criteria;
use crate::resource::Resource;

type Table<R> = BTreeMap<DbId, R>;

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

fn table_ref<R: Resource>(tables: &HashMap<TypeId, Box<dyn Any + Send + Sync>>) -> Option<&Table<R>> {
    tables
        .get(&TypeId::of::<R>())
        .and_then(|t| t.downcast_ref::<Table<R>>())
}

fn table_mut<R: Resource>(
    tables: &mut HashMap<TypeId, Box<dyn Any + Send + Sync>>,
) -> Result<&mut Table<R>, StoreError> {
    tables
        .entry(TypeId::of::<R>())
        .or_insert_with(|| Box::new(Table::<R>::new()))
        .downcast_mut::<Table<R>>()
        .ok_or_else(|| StoreError::Internal(format!("table {} has the wrong row type", R::TABLE)))
}

fn is_live<R: Resource>(row: &R) -> bool {
    row.removed_at().is_none()
}

/// Values of `columns` in `row`, or `None` if any of them is null.
fn key_of(row: &Value, columns: &[&str]) -> Option<Vec<Value>> {
    columns
        .iter()
        .map(|c| row.get(*c).filter(|v| !v.is_null()).cloned())
        .collect()
}

/// Reject `candidate` if it shares a unique key with another live row.
fn check_unique<R: Resource>(table: &Table<R>, candidate: &R) -> Result<(), StoreError> {
    if R::UNIQUE.is_empty() || !is_live(candidate) {
        return Ok(());
    }
    let candidate_json = serde_json::to_value(candidate)?;
    for columns in R::UNIQUE {
        let Some(key) = key_of(&candidate_json, columns) else {
            continue;
        };
        for other in table.values() {
            if other.id() == candidate.id() || !is_live(other) {
                continue;
            }
            let other_json = serde_json::to_value(other)?;
            if key_of(&other_json, columns).as_ref() == Some(&key) {
                return Err(StoreError::Conflict(format!(
                    "{} with the same {} already exists",
                    R::ENTITY,
                    columns.join(", ")
                )));
            }
        }
    }
    Ok(())
}

impl MemoryStore {
    pub async fn insert<R: Resource>(&self, row: R) -> Result<R, StoreError> {
        let mut tables = self.tables.write().await;
        let table = table_mut::<R>(&mut tables)?;
        if table.contains_key(&row.id()) {
            return Err(StoreError::Conflict(format!(
                "{} {} already exists",
                R::ENTITY,
                row.id()
            )));
        }
        check_unique(table, &row)?;
        table.insert(row.id(), row.clone());
        Ok(row)
    }

    pub async fn find<R: Resource>(&self, id: DbId) -> Result<Option<R>, StoreError> {
        let tables = self.tables.read().await;
        Ok(table_ref::<R>(&tables).and_then(|t| t.get(&id)).cloned())
    }

    pub async fn search<R: Resource>(
        &self,
        criteria: &Criteria,
        window: PageWindow,
    ) -> Result<Page<R>, StoreError> {
        let tables = self.tables.read().await;
        let Some(table) = table_ref::<R>(&tables) else {
            return Ok(Page::from_all(window, Vec::new()));
        };

        let mut matching = Vec::new();
        for row in table.values().rev().filter(|r| is_live(*r)) {
            if criteria.is_empty() || criteria.matches(&serde_json::to_value(row)?) {
                matching.push(row.clone());
            }
        }
        Ok(Page::from_all(window, matching))
    }

    pub async fn modify<R, F>(&self, id: DbId, change: F) -> Result<Option<R>, StoreError>
    where
        R: Resource,
        F: FnOnce(&mut R) -> Result<(), StoreError>,
    {
        let mut tables = self.tables.write().await;
        let table = table_mut::<R>(&mut tables)?;
        let Some(mut row) = table.get(&id).filter(|r| is_live(*r)).cloned() else {
            return Ok(None);
        };
        change(&mut row)?;
        check_unique(table, &row)?;
        table.insert(id, row.clone());
        Ok(Some(row))
    }

    pub async fn remove<R: Resource>(&self, id: DbId) -> Result<Option<R>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(table_mut::<R>(&mut tables)?.remove(&id))
    }

    /// Number of stored rows of `R`, tombstoned ones included.
    pub async fn row_count<R: Resource>(&self) -> usize {
        let tables = self.tables.read().await;
        table_ref::<R>(&tables).map_or(0, |t| t.len())
    }
}
