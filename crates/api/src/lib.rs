//! Commons API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes) so
//! integration tests, the client test suite and the binary entrypoint share
//! one router.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod router;
pub mod routes;
pub mod state;
