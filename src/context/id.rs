//! Deterministic run identifiers.

use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

/// Hex characters kept from each hash.
const HASH_PREFIX_LEN: usize = 8;

/// Identifies one (analyzer, project) pair.
///
/// The same pair always yields the same id, so repeated runs reuse the same
/// cache and results directories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(String);

impl RunId {
    /// Compute the id from the analyzer name and the absolute project path.
    pub fn compute(analyzer: &str, absolute_project_dir: &Path) -> Self {
        let project = absolute_project_dir.to_string_lossy();
        Self(format!(
            "{}-{}",
            &sha256_hex(analyzer)[..HASH_PREFIX_LEN],
            &sha256_hex(&project)[..HASH_PREFIX_LEN]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn sha256_hex(s: &str) -> String {
    let digest = Sha256::digest(s.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
