//! Project validation and diagnostics.
//!
//! All checks are advisory and read-only. Validation is the one place the
//! forward and backward paths meet: a manifest's expectations are compared
//! against a fresh discovery run, and any gap is reported as drift. A
//! missing manifest is a warning, never an error — the tool must work on
//! hand-built projects it did not generate.

use crate::discover::{discover, SlotId};
use crate::error::ForgeError;
use crate::inputs::ServiceType;
use crate::manifest::{ServiceManifest, TOOL_VERSION};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

const REQUIRED_FILES: &[&str] = &[paths::WRANGLER_TOML, paths::PACKAGE_JSON, paths::ENTRY_POINT];

pub fn validate(root: &Path) -> ValidationReport {
    let mut issues = Vec::new();

    // 1. Required top-level files. Parsing checks only make sense once
    //    everything is present, so missing files short-circuit.
    for file in REQUIRED_FILES {
        if !root.join(file).exists() {
            issues.push(format!("required file missing: {file}"));
        }
    }
    if !issues.is_empty() {
        return ValidationReport {
            valid: false,
            issues,
        };
    }

    // 2. Dependency manifest parses and has mandatory fields.
    check_package_json(root, &mut issues);

    // 3. Deployment descriptor is well-formed.
    check_wrangler_toml(root, &mut issues);

    // 4. If a service manifest exists, cross-check it against a fresh
    //    discovery run.
    match ServiceManifest::load(root) {
        Ok(manifest) => check_manifest_drift(root, &manifest, &mut issues),
        Err(ForgeError::ManifestNotFound(_)) => {}
        Err(e) => issues.push(format!("service manifest does not parse: {e}")),
    }

    ValidationReport {
        valid: issues.is_empty(),
        issues,
    }
}

fn check_package_json(root: &Path, issues: &mut Vec<String>) {
    let raw = match std::fs::read_to_string(paths::package_json_path(root)) {
        Ok(raw) => raw,
        Err(e) => {
            issues.push(format!("dependency manifest unreadable: {e}"));
            return;
        }
    };
    let doc: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(doc) => doc,
        Err(e) => {
            issues.push(format!("dependency manifest does not parse: {e}"));
            return;
        }
    };
    if doc.get("name").and_then(|v| v.as_str()).unwrap_or("").is_empty() {
        issues.push("dependency manifest missing mandatory field: name".to_string());
    }
    if doc.get("dependencies").is_none() && doc.get("scripts").is_none() {
        issues.push(
            "dependency manifest declares neither dependencies nor scripts".to_string(),
        );
    }
}

fn check_wrangler_toml(root: &Path, issues: &mut Vec<String>) {
    let raw = match std::fs::read_to_string(paths::wrangler_path(root)) {
        Ok(raw) => raw,
        Err(e) => {
            issues.push(format!("deployment descriptor unreadable: {e}"));
            return;
        }
    };
    let doc: toml::Value = match toml::from_str(&raw) {
        Ok(doc) => doc,
        Err(e) => {
            issues.push(format!("deployment descriptor does not parse: {e}"));
            return;
        }
    };
    if doc.get("name").and_then(|v| v.as_str()).is_none() {
        issues.push("deployment descriptor missing mandatory field: name".to_string());
    }
}

fn check_manifest_drift(root: &Path, manifest: &ServiceManifest, issues: &mut Vec<String>) {
    for file in manifest.all_files() {
        if !root.join(file).exists() {
            issues.push(format!("manifest lists a file that is missing on disk: {file}"));
        }
    }

    let model = discover(root);
    for slot in expected_slots(manifest.inputs.service_type) {
        if !model.configured(slot) {
            issues.push(format!(
                "configuration mismatch: manifest expects {slot} configured but it is not discoverable"
            ));
        }
    }
}

/// Capabilities a generation run configures for a given service type.
fn expected_slots(service_type: ServiceType) -> Vec<SlotId> {
    let mut out = vec![
        SlotId::Deployment,
        SlotId::Framework,
        SlotId::Storage,
        SlotId::Security,
        SlotId::Monitoring,
    ];
    match service_type {
        ServiceType::DataService => out.push(SlotId::Database),
        ServiceType::ApiGateway => out.push(SlotId::Messaging),
        ServiceType::AuthService => out.push(SlotId::Authentication),
        ServiceType::ContentService | ServiceType::Generic => {}
    }
    out
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

pub fn diagnose(root: &Path, deep: bool) -> DiagnosticReport {
    let validation = validate(root);
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    match ServiceManifest::load(root) {
        Ok(manifest) => {
            if manifest.tool_version != TOOL_VERSION {
                warnings.push(format!(
                    "project was generated by svcforge {} (current: {TOOL_VERSION})",
                    manifest.tool_version
                ));
            }
        }
        Err(_) => warnings.push(
            "no service manifest found; drift checks were skipped (hand-built project?)"
                .to_string(),
        ),
    }
    if !paths::dev_vars_path(root).exists() {
        warnings.push("no .dev.vars file; local development variables are unset".to_string());
    }

    // The deep scan appends best-practice recommendations, never new
    // hard errors.
    if deep {
        if !root.join(paths::README_MD).exists() {
            recommendations.push("add project documentation (README.md)".to_string());
        }
        if !root.join(paths::TEST_DIR).is_dir() {
            recommendations.push("add test scaffolding under test/".to_string());
        }
        if !root.join(paths::DEPLOY_WORKFLOW).exists() {
            recommendations.push("add a CI pipeline (.github/workflows/deploy.yml)".to_string());
        }
        if let Ok(gitignore) = std::fs::read_to_string(root.join(paths::GITIGNORE)) {
            if !gitignore.lines().any(|l| l == paths::DEV_VARS) {
                recommendations
                    .push("gitignore .dev.vars so local credentials stay local".to_string());
            }
        } else {
            recommendations.push("add a .gitignore covering .dev.vars".to_string());
        }
    }

    DiagnosticReport {
        errors: validation.issues,
        warnings,
        recommendations,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use crate::generate::{generate, GenerateOptions};
    use crate::inputs::RawCoreInputs;
    use tempfile::TempDir;

    fn generated_project(service_type: &str) -> TempDir {
        let inputs = RawCoreInputs {
            service_name: "billing-api".into(),
            service_type: service_type.into(),
            domain_name: "example.com".into(),
            api_credential: "a".repeat(40),
            account_id: "0123456789abcdef0123456789abcdef".into(),
            zone_id: "fedcba9876543210fedcba9876543210".into(),
            environment: "production".into(),
        }
        .build()
        .unwrap();
        let derived = derive(&inputs);
        let dir = TempDir::new().unwrap();
        generate(&inputs, &derived, dir.path(), &GenerateOptions::default()).unwrap();
        dir
    }

    #[test]
    fn generated_project_validates_clean() {
        let dir = generated_project("data-service");
        let report = validate(dir.path());
        assert!(report.valid, "unexpected issues: {:?}", report.issues);
    }

    #[test]
    fn deleted_dependency_manifest_is_exactly_one_issue() {
        let dir = generated_project("data-service");
        std::fs::remove_file(dir.path().join("package.json")).unwrap();

        let report = validate(dir.path());
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 1, "issues: {:?}", report.issues);
        assert!(report.issues[0].contains("package.json"));
    }

    #[test]
    fn hand_built_project_without_manifest_is_valid() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("wrangler.toml"), "name = \"hand-built\"\n").unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"name": "hand-built", "dependencies": {"hono": "^4.0.0"}}"#,
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/index.ts"), "export default {};\n").unwrap();

        let report = validate(dir.path());
        assert!(report.valid, "unexpected issues: {:?}", report.issues);

        let diag = diagnose(dir.path(), false);
        assert!(diag.errors.is_empty());
        assert!(diag.warnings.iter().any(|w| w.contains("manifest")));
    }

    #[test]
    fn package_json_without_name_is_flagged() {
        let dir = generated_project("generic");
        std::fs::write(dir.path().join("package.json"), r#"{"dependencies": {}}"#).unwrap();

        let report = validate(dir.path());
        assert!(!report.valid);
        assert!(report
            .issues
            .iter()
            .any(|i| i.contains("mandatory field: name")));
    }

    #[test]
    fn deleted_generated_file_reports_drift() {
        let dir = generated_project("generic");
        std::fs::remove_file(dir.path().join("README.md")).unwrap();

        let report = validate(dir.path());
        assert!(!report.valid);
        assert!(report
            .issues
            .iter()
            .any(|i| i.contains("missing on disk") && i.contains("README.md")));
    }

    #[test]
    fn stripped_descriptor_reports_configuration_mismatch() {
        let dir = generated_project("data-service");
        // Keep the descriptor parsable but drop every binding and var.
        std::fs::write(dir.path().join("wrangler.toml"), "name = \"billing-api\"\n").unwrap();

        let report = validate(dir.path());
        assert!(!report.valid);
        assert!(report
            .issues
            .iter()
            .any(|i| i.contains("configuration mismatch") && i.contains("database")));
    }

    #[test]
    fn deep_scan_recommends_missing_practices() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("wrangler.toml"), "name = \"svc\"\n").unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"name": "svc", "scripts": {}}"#,
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/index.ts"), "export default {};\n").unwrap();

        let shallow = diagnose(dir.path(), false);
        assert!(shallow.recommendations.is_empty());

        let deep = diagnose(dir.path(), true);
        assert!(deep.errors.is_empty());
        assert!(deep.recommendations.iter().any(|r| r.contains("README")));
        assert!(deep.recommendations.iter().any(|r| r.contains("test")));
        assert!(deep.recommendations.iter().any(|r| r.contains("CI")));
    }

    #[test]
    fn validation_never_mutates_the_project() {
        let dir = generated_project("generic");
        let before: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        validate(dir.path());
        diagnose(dir.path(), true);
        let after: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(before.len(), after.len());
    }
}
