//! Migration checksums
//!
//! Each applied migration records a digest of its SQL; a later run with
//! edited SQL under the same id is refused rather than silently skipped.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 checksum of a migration's SQL, hex-encoded
pub fn compute_checksum(sql: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sql.as_bytes());
    hex::encode(hasher.finalize())
}
