use crate::derive::{DerivedId, DerivedValue, UserModification};
use crate::error::{ForgeError, Result};
use crate::inputs::CoreInputs;
use crate::io;
use crate::paths;
use crate::registry::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// ServiceManifest
// ---------------------------------------------------------------------------

/// The record of one generation run, written last after every generator
/// succeeded. Read back by validation/diagnostics and, as a hint only,
/// by discovery. The echoed credential is masked; the full token is
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceManifest {
    #[serde(default = "default_version")]
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub inputs: CoreInputs,
    pub derived: BTreeMap<DerivedId, DerivedValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifications: Vec<UserModification>,
    /// Relative paths of every generated artifact, grouped by category.
    pub files: BTreeMap<Category, Vec<String>>,
    /// Content-independent checksum over the sorted path list. Detects
    /// added/removed files across runs, not content drift.
    pub checksum: String,
}

fn default_version() -> u32 {
    1
}

impl ServiceManifest {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::manifest_path(root);
        if !path.exists() {
            return Err(ForgeError::ManifestNotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::manifest_path(root);
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&path, data.as_bytes())
    }

    /// Flat view of every recorded path.
    pub fn all_files(&self) -> impl Iterator<Item = &str> {
        self.files.values().flatten().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Checksum
// ---------------------------------------------------------------------------

/// SHA-256 over the sorted, newline-joined relative path list.
pub fn path_checksum<'a, I>(paths: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sorted: Vec<&str> = paths.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();
    let mut hasher = Sha256::new();
    hasher.update(sorted.join("\n").as_bytes());
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use crate::inputs::RawCoreInputs;
    use tempfile::TempDir;

    fn sample() -> ServiceManifest {
        let inputs = RawCoreInputs {
            service_name: "billing-api".into(),
            service_type: "data-service".into(),
            domain_name: "example.com".into(),
            api_credential: format!("abcd{}wxyz", "q".repeat(32)),
            account_id: "0123456789abcdef0123456789abcdef".into(),
            zone_id: "fedcba9876543210fedcba9876543210".into(),
            environment: "production".into(),
        }
        .build()
        .unwrap();
        let (derived, modifications) = derive(&inputs).into_parts();

        let mut files = BTreeMap::new();
        files.insert(
            Category::Core,
            vec!["wrangler.toml".to_string(), "package.json".to_string()],
        );
        files.insert(Category::Service, vec!["src/index.ts".to_string()]);

        let checksum = path_checksum(files.values().flatten().map(String::as_str));
        ServiceManifest {
            version: 1,
            generated_at: "2026-01-15T12:00:00Z".parse().unwrap(),
            tool_version: TOOL_VERSION.to_string(),
            inputs,
            derived,
            modifications,
            files,
            checksum,
        }
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let manifest = sample();
        manifest.save(dir.path()).unwrap();

        let loaded = ServiceManifest::load(dir.path()).unwrap();
        assert_eq!(loaded.inputs.service_name, "billing-api");
        assert_eq!(loaded.checksum, manifest.checksum);
        assert_eq!(loaded.all_files().count(), 3);
    }

    #[test]
    fn persisted_manifest_masks_the_credential() {
        let dir = TempDir::new().unwrap();
        sample().save(dir.path()).unwrap();

        let raw = std::fs::read_to_string(paths::manifest_path(dir.path())).unwrap();
        assert!(!raw.contains("qqqq"), "full token leaked into manifest");
        assert!(raw.contains("abcd\u{2026}wxyz"));
    }

    #[test]
    fn load_missing_manifest() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            ServiceManifest::load(dir.path()),
            Err(ForgeError::ManifestNotFound(_))
        ));
    }

    #[test]
    fn checksum_ignores_order() {
        let a = path_checksum(["b.txt", "a.txt"]);
        let b = path_checksum(["a.txt", "b.txt"]);
        assert_eq!(a, b);
    }

    #[test]
    fn checksum_detects_added_files() {
        let a = path_checksum(["a.txt"]);
        let b = path_checksum(["a.txt", "b.txt"]);
        assert_ne!(a, b);
    }
}
