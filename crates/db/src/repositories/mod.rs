//! Repository layer.
//!
//! A single zero-sized repository serves every entity: it is generic over
//! [`Resource`](crate::resource::Resource) and accepts the shared
//! [`Database`](crate::store::Database) handle as the first argument.

pub mod resource_repo;

pub use resource_repo::ResourceRepo;
