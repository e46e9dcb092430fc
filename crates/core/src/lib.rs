//! Domain primitives shared by every layer of the Commons API.
//!
//! Nothing in this crate performs I/O: it holds the error taxonomy, id and
//! timestamp aliases, the pagination contract, delete-reply conventions and
//! DTO validation helpers.

pub mod deletion;
pub mod error;
pub mod nullable;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod validation;
