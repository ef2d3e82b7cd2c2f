//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the `XldApi` boundary trait but are themselves
//! concrete structs, not traits.

mod connection;
mod metadata;
mod repository;

pub use connection::ConnectionService;
pub use metadata::MetadataService;
pub use repository::RepositoryService;
