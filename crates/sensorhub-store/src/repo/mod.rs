//! SQLite-backed store implementations

mod sqlite_identity;
mod sqlite_metadata;

pub use sqlite_identity::SqliteIdentityStore;
pub use sqlite_metadata::SqliteMetadataStore;
