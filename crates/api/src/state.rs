use std::sync::Arc;

use commons_db::Database;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the storage handle is a pool or an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Postgres pool or in-memory store.
    pub db: Database,
    /// Server configuration (JWT settings are read by the auth extractors).
    pub config: Arc<ServerConfig>,
}
