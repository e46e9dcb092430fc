//! One generic function per operation, usable with every resource.
//!
//! ```ignore
//! use commons_client::{create, Connection};
//! use commons_client::models::tag::{CreateTag, Tag};
//!
//! let conn = Connection::new("http://localhost:3000");
//! let tag: Tag = create::<Tag>(&conn, &CreateTag { name: "rust".into(), description: None }).await?;
//! ```

use commons_core::deletion::{DeleteConfirmation, DeleteReply};
use commons_core::pagination::{Page, PageRequest};
use commons_core::types::DbId;
use commons_db::{ChildResource, Resource};
use reqwest::Method;

use crate::connection::Connection;
use crate::error::ClientError;
use crate::fixtures::{random, random_page, Fixture};
use crate::simulate;

/// What a delete answered with, per the entity's reply convention.
#[derive(Debug, Clone, PartialEq)]
pub enum Erased<R> {
    /// `204 No Content`.
    Gone,
    /// The row as it stood after the delete.
    Entity(R),
    Confirmed(DeleteConfirmation),
}

fn item_path<R: Resource>(id: DbId) -> String {
    format!("{}/{id}", R::PATH)
}

/// `POST /` -- create a row.
pub async fn create<R>(conn: &Connection, input: &R::Create) -> Result<R, ClientError>
where
    R: Resource + Fixture,
{
    if conn.simulate {
        simulate::check_body(input)?;
        return Ok(random());
    }
    conn.fetch(Method::POST, R::PATH, Some(input)).await
}

/// `GET /?page=&limit=` -- unfiltered page.
pub async fn index<R>(conn: &Connection, paging: PageRequest) -> Result<Page<R>, ClientError>
where
    R: Resource + Fixture,
{
    if conn.simulate {
        let window = simulate::check_paging(paging)?;
        return Ok(random_page(window, &mut rand::rng()));
    }

    conn.fetch_query(R::PATH, &paging).await
}

/// `PATCH /` -- filtered page.
pub async fn search<R>(conn: &Connection, search: &R::Search) -> Result<Page<R>, ClientError>
where
    R: Resource + Fixture,
{
    if conn.simulate {
        let window = simulate::check_paging(R::page_request(search))?;
        return Ok(random_page(window, &mut rand::rng()));
    }
    conn.fetch(Method::PATCH, R::PATH, Some(search)).await
}

/// `GET /{id}` -- one row.
pub async fn at<R>(conn: &Connection, id: DbId) -> Result<R, ClientError>
where
    R: Resource + Fixture,
{
    if conn.simulate {
        return Ok(random());
    }
    conn.fetch::<_, ()>(Method::GET, &item_path::<R>(id), None)
        .await
}

/// `PUT /{id}` -- replace the mutable fields of a row.
pub async fn update<R>(conn: &Connection, id: DbId, input: &R::Update) -> Result<R, ClientError>
where
    R: Resource + Fixture,
{
    if conn.simulate {
        simulate::check_body(input)?;
        return Ok(random());
    }
    conn.fetch(Method::PUT, &item_path::<R>(id), Some(input))
        .await
}

/// `DELETE /{id}` -- delete a row and decode the entity's reply shape.
pub async fn erase<R>(conn: &Connection, id: DbId) -> Result<Erased<R>, ClientError>
where
    R: Resource + Fixture,
{
    if conn.simulate {
        return Ok(simulated_erase(id));
    }

    erase_path(conn, &item_path::<R>(id)).await
}

async fn erase_path<R: Resource>(conn: &Connection, path: &str) -> Result<Erased<R>, ClientError> {
    match R::DELETE_REPLY {
        DeleteReply::NoContent => {
            conn.send::<()>(Method::DELETE, path, None).await?;
            Ok(Erased::Gone)
        }
        DeleteReply::Entity => conn
            .fetch::<_, ()>(Method::DELETE, path, None)
            .await
            .map(Erased::Entity),
        DeleteReply::Confirmation => conn
            .fetch::<_, ()>(Method::DELETE, path, None)
            .await
            .map(Erased::Confirmed),
    }
}

fn simulated_erase<R: Resource + Fixture>(id: DbId) -> Erased<R> {
    match R::DELETE_REPLY {
        DeleteReply::NoContent => Erased::Gone,
        DeleteReply::Entity => Erased::Entity(random()),
        DeleteReply::Confirmation => Erased::Confirmed(DeleteConfirmation::deleted(id)),
    }
}

// ---------------------------------------------------------------------------
// Below a parent
// ---------------------------------------------------------------------------

/// `R::PATH` with its parent placeholder replaced by `parent`.
fn collection_path<R: ChildResource>(parent: DbId) -> String {
    match (R::PATH.find('{'), R::PATH.find('}')) {
        (Some(open), Some(close)) if open < close => {
            format!("{}{parent}{}", &R::PATH[..open], &R::PATH[close + 1..])
        }
        _ => R::PATH.to_string(),
    }
}

fn child_path<R: ChildResource>(parent: DbId, id: DbId) -> String {
    format!("{}/{id}", collection_path::<R>(parent))
}

/// `POST /` below `parent`.
pub async fn create_in<R>(conn: &Connection, parent: DbId, body: &R::Body) -> Result<R, ClientError>
where
    R: ChildResource + Fixture,
{
    if conn.simulate {
        simulate::check_body(body)?;
        return Ok(random());
    }
    conn.fetch(Method::POST, &collection_path::<R>(parent), Some(body))
        .await
}

/// `GET /?page=&limit=` below `parent`.
pub async fn index_in<R>(
    conn: &Connection,
    parent: DbId,
    paging: PageRequest,
) -> Result<Page<R>, ClientError>
where
    R: ChildResource + Fixture,
{
    if conn.simulate {
        let window = simulate::check_paging(paging)?;
        return Ok(random_page(window, &mut rand::rng()));
    }
    conn.fetch_query(&collection_path::<R>(parent), &paging)
        .await
}

/// `PATCH /` below `parent`.
pub async fn search_in<R>(
    conn: &Connection,
    parent: DbId,
    search: &R::Search,
) -> Result<Page<R>, ClientError>
where
    R: ChildResource + Fixture,
{
    if conn.simulate {
        let window = simulate::check_paging(R::page_request(search))?;
        return Ok(random_page(window, &mut rand::rng()));
    }
    conn.fetch(Method::PATCH, &collection_path::<R>(parent), Some(search))
        .await
}

/// `GET /{id}` below `parent`.
pub async fn at_in<R>(conn: &Connection, parent: DbId, id: DbId) -> Result<R, ClientError>
where
    R: ChildResource + Fixture,
{
    if conn.simulate {
        return Ok(random());
    }
    conn.fetch::<_, ()>(Method::GET, &child_path::<R>(parent, id), None)
        .await
}

/// `PUT /{id}` below `parent`.
pub async fn update_in<R>(
    conn: &Connection,
    parent: DbId,
    id: DbId,
    input: &R::Update,
) -> Result<R, ClientError>
where
    R: ChildResource + Fixture,
{
    if conn.simulate {
        simulate::check_body(input)?;
        return Ok(random());
    }
    conn.fetch(Method::PUT, &child_path::<R>(parent, id), Some(input))
        .await
}

/// `DELETE /{id}` below `parent`.
pub async fn erase_in<R>(conn: &Connection, parent: DbId, id: DbId) -> Result<Erased<R>, ClientError>
where
    R: ChildResource + Fixture,
{
    if conn.simulate {
        return Ok(simulated_erase(id));
    }
    erase_path(conn, &child_path::<R>(parent, id)).await
}
