//! Tier 3: the generation coordinator.
//!
//! Single-threaded and strictly ordered: skeleton directories first, then
//! generators in the registry's dependency order, then the manifest as the
//! final artifact. A generator failure aborts the run with the generator's
//! identity attached; files written before the failure stay on disk (the
//! run is not transactional at the filesystem level).

use crate::derive::DerivedValues;
use crate::error::{ForgeError, Result};
use crate::inputs::CoreInputs;
use crate::io;
use crate::manifest::{path_checksum, ServiceManifest, TOOL_VERSION};
use crate::paths;
use crate::registry::{Category, GenContext, GeneratorRegistry};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Options / Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Overwrite existing files. Unset, every pre-existing file is skipped
    /// per-file and reported in the outcome.
    pub overwrite: bool,
    /// Timestamp recorded in the manifest; defaults to now. Injectable so
    /// tests stay deterministic.
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub manifest: ServiceManifest,
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Run the default generator set against `target`.
pub fn generate(
    inputs: &CoreInputs,
    derived: &DerivedValues,
    target: &Path,
    options: &GenerateOptions,
) -> Result<GenerationOutcome> {
    generate_with(&GeneratorRegistry::with_defaults(), inputs, derived, target, options)
}

/// Run an explicit generator set against `target`.
pub fn generate_with(
    registry: &GeneratorRegistry,
    inputs: &CoreInputs,
    derived: &DerivedValues,
    target: &Path,
    options: &GenerateOptions,
) -> Result<GenerationOutcome> {
    if target.exists() && !target.is_dir() {
        return Err(ForgeError::TargetNotDirectory(target.display().to_string()));
    }

    // 1. Fixed directory skeleton, idempotent.
    io::ensure_dir(target)?;
    for dir in paths::SKELETON_DIRS {
        io::ensure_dir(&target.join(dir))?;
    }

    // 2. Generators, in declared dependency order.
    let ctx = GenContext {
        inputs,
        derived,
        target,
        overwrite: options.overwrite,
    };
    let order = registry.execution_order()?;

    let mut files: BTreeMap<Category, Vec<String>> = BTreeMap::new();
    let mut written = Vec::new();
    let mut skipped = Vec::new();
    for index in order {
        let generator = registry.get(index);
        let descriptor = generator.descriptor();
        tracing::debug!(generator = descriptor.name, "running generator");
        let output = generator
            .generate(&ctx)
            .map_err(|e| ForgeError::Generator {
                name: descriptor.name,
                message: e.to_string(),
            })?;
        files
            .entry(descriptor.category)
            .or_default()
            .extend(output.paths().map(str::to_string));
        written.extend(output.written);
        skipped.extend(output.skipped);
    }
    for list in files.values_mut() {
        list.sort_unstable();
        list.dedup();
    }

    // 3. Manifest, written last.
    let checksum = path_checksum(files.values().flatten().map(String::as_str));
    let manifest = ServiceManifest {
        version: 1,
        generated_at: options.timestamp.unwrap_or_else(Utc::now),
        tool_version: TOOL_VERSION.to_string(),
        inputs: inputs.clone(),
        derived: derived.clone().into_parts().0,
        modifications: derived.modifications().to_vec(),
        files,
        checksum,
    };
    manifest.save(target)?;

    Ok(GenerationOutcome {
        manifest,
        written,
        skipped,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use crate::inputs::RawCoreInputs;
    use crate::registry::{GenOutput, Generator, GeneratorDescriptor};
    use tempfile::TempDir;

    fn inputs() -> CoreInputs {
        RawCoreInputs {
            service_name: "billing-api".into(),
            service_type: "data-service".into(),
            domain_name: "example.com".into(),
            api_credential: "a".repeat(40),
            account_id: "0123456789abcdef0123456789abcdef".into(),
            zone_id: "fedcba9876543210fedcba9876543210".into(),
            environment: "production".into(),
        }
        .build()
        .unwrap()
    }

    fn opts() -> GenerateOptions {
        GenerateOptions {
            overwrite: false,
            timestamp: Some("2026-01-15T12:00:00Z".parse().unwrap()),
        }
    }

    #[test]
    fn generation_covers_every_category() {
        let inputs = inputs();
        let derived = derive(&inputs);
        let dir = TempDir::new().unwrap();

        let outcome = generate(&inputs, &derived, dir.path(), &opts()).unwrap();
        assert!(!outcome.written.is_empty());
        assert!(outcome.skipped.is_empty());
        for &category in Category::all() {
            let listed = outcome.manifest.files.get(&category);
            assert!(
                listed.map(|l| !l.is_empty()).unwrap_or(false),
                "no files for {category}"
            );
        }
        assert!(paths::manifest_path(dir.path()).exists());
    }

    #[test]
    fn regeneration_with_overwrite_is_checksum_idempotent() {
        let inputs = inputs();
        let derived = derive(&inputs);
        let dir = TempDir::new().unwrap();

        let first = generate(&inputs, &derived, dir.path(), &opts()).unwrap();
        let second = generate(
            &inputs,
            &derived,
            dir.path(),
            &GenerateOptions {
                overwrite: true,
                timestamp: Some("2026-02-01T08:00:00Z".parse().unwrap()),
            },
        )
        .unwrap();

        assert_eq!(first.manifest.checksum, second.manifest.checksum);
        assert!(second.skipped.is_empty());
    }

    #[test]
    fn guarded_rerun_skips_every_existing_file() {
        let inputs = inputs();
        let derived = derive(&inputs);
        let dir = TempDir::new().unwrap();

        let first = generate(&inputs, &derived, dir.path(), &opts()).unwrap();
        let rerun = generate(&inputs, &derived, dir.path(), &opts()).unwrap();

        assert!(rerun.written.is_empty());
        assert_eq!(rerun.skipped.len(), first.written.len());
        // The skip list is a report, not an error; the manifest still
        // covers the full file set.
        assert_eq!(first.manifest.checksum, rerun.manifest.checksum);
    }

    #[test]
    fn guarded_rerun_preserves_existing_content() {
        let inputs = inputs();
        let derived = derive(&inputs);
        let dir = TempDir::new().unwrap();
        generate(&inputs, &derived, dir.path(), &opts()).unwrap();

        let readme = dir.path().join("README.md");
        std::fs::write(&readme, "hand-edited").unwrap();
        generate(&inputs, &derived, dir.path(), &opts()).unwrap();
        assert_eq!(std::fs::read_to_string(&readme).unwrap(), "hand-edited");
    }

    struct WritesOne;
    struct AlwaysFails;

    const WRITES_ONE: GeneratorDescriptor = GeneratorDescriptor {
        name: "writes-one",
        category: Category::Core,
        depends_on: &[],
    };
    const ALWAYS_FAILS: GeneratorDescriptor = GeneratorDescriptor {
        name: "always-fails",
        category: Category::Service,
        depends_on: &["writes-one"],
    };

    impl Generator for WritesOne {
        fn descriptor(&self) -> &GeneratorDescriptor {
            &WRITES_ONE
        }
        fn generate(&self, ctx: &GenContext) -> Result<GenOutput> {
            let mut out = GenOutput::default();
            ctx.write_text(&mut out, "first.txt", "present")?;
            Ok(out)
        }
    }

    impl Generator for AlwaysFails {
        fn descriptor(&self) -> &GeneratorDescriptor {
            &ALWAYS_FAILS
        }
        fn generate(&self, _ctx: &GenContext) -> Result<GenOutput> {
            Err(ForgeError::InvalidInput {
                field: "template",
                reason: "boom".to_string(),
            })
        }
    }

    #[test]
    fn failing_generator_aborts_and_is_named() {
        let mut registry = GeneratorRegistry::new();
        registry.register(Box::new(WritesOne)).unwrap();
        registry.register(Box::new(AlwaysFails)).unwrap();

        let inputs = inputs();
        let derived = derive(&inputs);
        let dir = TempDir::new().unwrap();

        let err =
            generate_with(&registry, &inputs, &derived, dir.path(), &opts()).unwrap_err();
        assert!(
            matches!(err, ForgeError::Generator { name, .. } if name == "always-fails")
        );
        // Not transactional: the earlier generator's file stays on disk,
        // and no manifest is written.
        assert!(dir.path().join("first.txt").exists());
        assert!(!paths::manifest_path(dir.path()).exists());
    }

    #[test]
    fn target_must_be_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, "x").unwrap();

        let inputs = inputs();
        let derived = derive(&inputs);
        assert!(matches!(
            generate(&inputs, &derived, &file, &opts()),
            Err(ForgeError::TargetNotDirectory(_))
        ));
    }
}
