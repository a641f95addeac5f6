//! Migration framework
//!
//! Provides:
//! - Migration runner with checksums and idempotent application
//! - Embedded SQL migrations, split per backing store

mod checksums;
mod embedded;
mod runner;

pub use embedded::{identity_migrations, metadata_migrations, Migration};
pub use runner::apply_migrations;
