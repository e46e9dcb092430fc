//! Typed client for the Commons API.
//!
//! One generic function per operation ([`functional`]) works over every
//! entity in [`models`]. A [`Connection`] either talks HTTP to a running
//! server or, with `simulate` set, validates the request locally and answers
//! with random fixture data.

pub mod connection;
pub mod error;
pub mod fixtures;
pub mod functional;
pub mod simulate;

pub use commons_db::models;
pub use connection::Connection;
pub use error::{ClientError, HttpFailure};
pub use fixtures::Fixture;
pub use functional::{
    at, at_in, create, create_in, erase, erase_in, index, index_in, search, search_in, update,
    update_in, Erased,
};
