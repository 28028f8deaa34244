//! Task management
//!
//! - [`repository`]: the ordered, persisted task collection
//! - [`seed`]: external sources of seed tasks for [`TaskRepository::seed_merge`]

pub mod repository;
pub mod seed;

pub use repository::{RepositoryError, SeedReport, TaskRepository};
pub use seed::{FileSeedSource, HttpSeedSource, SeedDocument, SeedError, SeedSource, StaticSeedSource};
