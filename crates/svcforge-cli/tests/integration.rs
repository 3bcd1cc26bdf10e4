#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn svcforge() -> Command {
    Command::cargo_bin("svcforge").unwrap()
}

fn generate_args(dir: &TempDir) -> Vec<String> {
    vec![
        "generate".into(),
        "--target".into(),
        dir.path().display().to_string(),
        "--service-name".into(),
        "billing-api".into(),
        "--service-type".into(),
        "data-service".into(),
        "--domain-name".into(),
        "example.com".into(),
        "--api-credential".into(),
        "a".repeat(40),
        "--account-id".into(),
        "0123456789abcdef0123456789abcdef".into(),
        "--zone-id".into(),
        "fedcba9876543210fedcba9876543210".into(),
        "--environment".into(),
        "production".into(),
    ]
}

fn generate_project(dir: &TempDir) {
    svcforge().args(generate_args(dir)).assert().success();
}

// ---------------------------------------------------------------------------
// svcforge generate
// ---------------------------------------------------------------------------

#[test]
fn generate_creates_full_artifact_set() {
    let dir = TempDir::new().unwrap();
    svcforge()
        .args(generate_args(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("created: wrangler.toml"));

    for file in [
        "wrangler.toml",
        "package.json",
        "tsconfig.json",
        "src/index.ts",
        "src/config.ts",
        ".dev.vars",
        ".env.example",
        ".gitignore",
        "test/index.test.ts",
        "vitest.config.ts",
        "README.md",
        ".github/workflows/deploy.yml",
        ".svcforge/manifest.yaml",
    ] {
        assert!(dir.path().join(file).exists(), "missing {file}");
    }
}

#[test]
fn generate_never_persists_the_credential() {
    let dir = TempDir::new().unwrap();
    generate_project(&dir);

    let manifest =
        std::fs::read_to_string(dir.path().join(".svcforge/manifest.yaml")).unwrap();
    assert!(!manifest.contains(&"a".repeat(40)), "token leaked into manifest");

    let dev_vars = std::fs::read_to_string(dir.path().join(".dev.vars")).unwrap();
    assert!(!dev_vars.contains(&"a".repeat(40)), "token leaked into .dev.vars");
}

#[test]
fn guarded_rerun_reports_skips() {
    let dir = TempDir::new().unwrap();
    generate_project(&dir);

    svcforge()
        .args(generate_args(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped: wrangler.toml"));
}

#[test]
fn overwrite_rerun_is_checksum_idempotent() {
    let dir = TempDir::new().unwrap();
    generate_project(&dir);
    let first: serde_yaml::Value = serde_yaml::from_str(
        &std::fs::read_to_string(dir.path().join(".svcforge/manifest.yaml")).unwrap(),
    )
    .unwrap();

    let mut args = generate_args(&dir);
    args.push("--overwrite".into());
    svcforge().args(args).assert().success();

    let second: serde_yaml::Value = serde_yaml::from_str(
        &std::fs::read_to_string(dir.path().join(".svcforge/manifest.yaml")).unwrap(),
    )
    .unwrap();
    assert_eq!(first["checksum"], second["checksum"]);
}

#[test]
fn non_interactive_generate_lists_every_violation() {
    let dir = TempDir::new().unwrap();
    svcforge()
        .args([
            "generate",
            "--target",
            &dir.path().display().to_string(),
            "--service-name",
            "BAD NAME",
            "--service-type",
            "data-service",
            "--domain-name",
            "not_a_domain",
            "--api-credential",
            "short",
            "--account-id",
            "0123456789abcdef0123456789abcdef",
            "--zone-id",
            "fedcba9876543210fedcba9876543210",
            "--environment",
            "production",
            "--non-interactive",
        ])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("service_name")
                .and(predicate::str::contains("domain_name"))
                .and(predicate::str::contains("api_credential")),
        );
}

// ---------------------------------------------------------------------------
// svcforge discover / assess (round trip)
// ---------------------------------------------------------------------------

#[test]
fn discover_round_trips_a_generated_project() {
    let dir = TempDir::new().unwrap();
    generate_project(&dir);

    let output = svcforge()
        .args(["discover", &dir.path().display().to_string(), "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let model: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(model["deployment"]["configured"], true);
    assert_eq!(model["framework"]["configured"], true);
    assert_eq!(model["framework"]["provider"], "hono");
    assert_eq!(model["database"]["configured"], true);
    assert_eq!(model["database"]["quantity"], 1);
}

#[test]
fn discover_on_empty_dir_reports_nothing_configured() {
    let dir = TempDir::new().unwrap();
    let output = svcforge()
        .args(["discover", &dir.path().display().to_string(), "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let model: serde_json::Value = serde_json::from_slice(&output).unwrap();

    for slot in [
        "deployment",
        "database",
        "storage",
        "messaging",
        "authentication",
        "framework",
        "security",
        "monitoring",
    ] {
        assert_eq!(model[slot]["configured"], false, "slot {slot}");
    }
}

#[test]
fn assess_scores_a_generated_project_as_mature() {
    let dir = TempDir::new().unwrap();
    generate_project(&dir);

    let output = svcforge()
        .args(["assess", &dir.path().display().to_string(), "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let result: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(result["completeness"], 100);
    assert_eq!(result["maturity"], "mature");
}

#[test]
fn assess_empty_dir_is_basic() {
    let dir = TempDir::new().unwrap();
    let output = svcforge()
        .args(["assess", &dir.path().display().to_string(), "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let result: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(result["completeness"], 0);
    assert_eq!(result["maturity"], "basic");
}

// ---------------------------------------------------------------------------
// svcforge validate / diagnose
// ---------------------------------------------------------------------------

#[test]
fn validate_passes_on_generated_project() {
    let dir = TempDir::new().unwrap();
    generate_project(&dir);

    svcforge()
        .args(["validate", &dir.path().display().to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn validate_flags_deleted_dependency_manifest() {
    let dir = TempDir::new().unwrap();
    generate_project(&dir);
    std::fs::remove_file(dir.path().join("package.json")).unwrap();

    let output = svcforge()
        .args(["validate", &dir.path().display().to_string(), "--json"])
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(report["valid"], false);
    let issues = report["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert!(issues[0].as_str().unwrap().contains("package.json"));
}

#[test]
fn diagnose_deep_recommends_practices_for_bare_projects() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("wrangler.toml"), "name = \"bare\"\n").unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        r#"{"name": "bare", "dependencies": {"hono": "^4.0.0"}}"#,
    )
    .unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/index.ts"), "export default {};\n").unwrap();

    svcforge()
        .args(["diagnose", &dir.path().display().to_string(), "--deep"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("README")
                .and(predicate::str::contains("manifest")),
        );
}
