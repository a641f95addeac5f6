//! Embedded SQL migrations
//!
//! Migrations are embedded at compile time using include_str! and split
//! per backing store, since the identity and metadata backends own
//! independent databases.

/// Migration metadata
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// Migrations for the Identity Store database, in order
pub fn identity_migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_sensors_table",
        sql: include_str!("../../migrations/001_sensors_table.sql"),
    }]
}

/// Migrations for the Metadata Store database, in order
pub fn metadata_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_metadata_documents",
            sql: include_str!("../../migrations/001_metadata_documents.sql"),
        },
        Migration {
            id: "002_location_index",
            sql: include_str!("../../migrations/002_location_index.sql"),
        },
    ]
}
