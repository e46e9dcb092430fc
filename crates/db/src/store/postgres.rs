//! Postgres backend.
//!
//! SQL is assembled with `QueryBuilder` from the resource's declared table,
//! column list and tombstone column. Identifiers only ever come from those
//! `'static` declarations; user input is always bound.

use commons_core::pagination::{Page, PageWindow};
use commons_core::types::DbId;
use sqlx::{Postgres, QueryBuilder};

use super::StoreError;
use crate::filter::Criteria;
use crate::resource::Resource;
use crate::DbPool;

/// `WHERE` clause shared by the count and page queries of a search.
fn push_live_filter<R: Resource>(qb: &mut QueryBuilder<'_, Postgres>, criteria: &Criteria) {
    qb.push(" WHERE TRUE");
    if let Some(column) = R::REMOVAL.tombstone_column() {
        qb.push(format!(" AND {column} IS NULL"));
    }
    criteria.push_sql(qb);
}

/// `UPDATE ... SET (cols) = ROW(...)` for a full-row write-back.
fn update_statement<R: Resource>(row: &R) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "UPDATE {} SET ({}) = ROW(",
        R::TABLE,
        R::COLUMNS
    ));
    {
        let mut values = qb.separated(", ");
        row.bind_row(&mut values);
    }
    qb.push(") WHERE id = ")
        .push_bind(row.id())
        .push(format!(" RETURNING {}", R::COLUMNS));
    qb
}

pub async fn insert<R: Resource>(pool: &DbPool, row: &R) -> Result<R, StoreError> {
    let mut qb = QueryBuilder::new(format!("INSERT INTO {} ({}) ", R::TABLE, R::COLUMNS));
    qb.push_values(std::iter::once(row), |mut values, row| row.bind_row(&mut values));
    qb.push(format!(" RETURNING {}", R::COLUMNS));

    let created = qb.build_query_as::<R>().fetch_one(pool).await?;
    Ok(created)
}

pub async fn find<R: Resource>(pool: &DbPool, id: DbId) -> Result<Option<R>, StoreError> {
    let query = format!("SELECT {} FROM {} WHERE id = $1", R::COLUMNS, R::TABLE);
    let row = sqlx::query_as::<_, R>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn search<R: Resource>(
    pool: &DbPool,
    criteria: &Criteria,
    window: PageWindow,
) -> Result<Page<R>, StoreError> {
    let mut count = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", R::TABLE));
    push_live_filter::<R>(&mut count, criteria);
    let records: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = QueryBuilder::new(format!("SELECT {} FROM {}", R::COLUMNS, R::TABLE));
    push_live_filter::<R>(&mut select, criteria);
    select
        .push(" ORDER BY id DESC LIMIT ")
        .push_bind(i64::from(window.limit))
        .push(" OFFSET ")
        .push_bind(i64::try_from(window.offset()).unwrap_or(i64::MAX));
    let rows = select.build_query_as::<R>().fetch_all(pool).await?;

    Ok(Page::new(window, u64::try_from(records).unwrap_or(0), rows))
}

pub async fn modify<R, F>(pool: &DbPool, id: DbId, change: F) -> Result<Option<R>, StoreError>
where
    R: Resource,
    F: FnOnce(&mut R) -> Result<(), StoreError> + Send,
{
    let mut tx = pool.begin().await?;

    let mut lookup = format!("SELECT {} FROM {} WHERE id = $1", R::COLUMNS, R::TABLE);
    if let Some(column) = R::REMOVAL.tombstone_column() {
        lookup.push_str(&format!(" AND {column} IS NULL"));
    }
    lookup.push_str(" FOR UPDATE");

    let Some(mut row) = sqlx::query_as::<_, R>(&lookup)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
    else {
        return Ok(None);
    };

    // Dropping `tx` on error rolls back and releases the row lock.
    change(&mut row)?;
    let updated = update_statement(&row)
        .build_query_as::<R>()
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::debug!(table = R::TABLE, %id, "Row updated");
    Ok(Some(updated))
}

pub async fn remove<R: Resource>(pool: &DbPool, id: DbId) -> Result<Option<R>, StoreError> {
    let query = format!(
        "DELETE FROM {} WHERE id = $1 RETURNING {}",
        R::TABLE,
        R::COLUMNS
    );
    let row = sqlx::query_as::<_, R>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
