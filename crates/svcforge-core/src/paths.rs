use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Generated project layout
// ---------------------------------------------------------------------------

pub const WRANGLER_TOML: &str = "wrangler.toml";
pub const PACKAGE_JSON: &str = "package.json";
pub const TSCONFIG_JSON: &str = "tsconfig.json";

pub const SRC_DIR: &str = "src";
pub const ENTRY_POINT: &str = "src/index.ts";
pub const CONFIG_MODULE: &str = "src/config.ts";

pub const TEST_DIR: &str = "test";
pub const TEST_ENTRY: &str = "test/index.test.ts";
pub const VITEST_CONFIG: &str = "vitest.config.ts";

pub const DEV_VARS: &str = ".dev.vars";
pub const ENV_EXAMPLE: &str = ".env.example";
pub const GITIGNORE: &str = ".gitignore";

pub const README_MD: &str = "README.md";

pub const WORKFLOWS_DIR: &str = ".github/workflows";
pub const DEPLOY_WORKFLOW: &str = ".github/workflows/deploy.yml";

pub const FORGE_DIR: &str = ".svcforge";
pub const MANIFEST_FILE: &str = ".svcforge/manifest.yaml";

/// Directories created before any generator runs.
pub const SKELETON_DIRS: &[&str] = &[SRC_DIR, TEST_DIR, WORKFLOWS_DIR, FORGE_DIR];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn wrangler_path(root: &Path) -> PathBuf {
    root.join(WRANGLER_TOML)
}

pub fn package_json_path(root: &Path) -> PathBuf {
    root.join(PACKAGE_JSON)
}

pub fn entry_path(root: &Path) -> PathBuf {
    root.join(ENTRY_POINT)
}

pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILE)
}

pub fn dev_vars_path(root: &Path) -> PathBuf {
    root.join(DEV_VARS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
