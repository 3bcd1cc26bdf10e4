//! Capability discovery: infer what an existing project directory already
//! configures, from raw artifact inspection alone.
//!
//! Discovery is advisory and therefore total: every per-artifact failure
//! degrades that one contribution and a top-level failure still returns a
//! fully-defaulted model. Four independent analyses run on scoped threads;
//! the merge folds them in the fixed `ANALYSIS_PRECEDENCE` order, so
//! scheduling never changes the result.

use crate::paths;
use crate::probe::{CredentialProbe, NoopProbe};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// SlotId
// ---------------------------------------------------------------------------

/// The fixed capability slots, in declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SlotId {
    Deployment,
    Database,
    Storage,
    Messaging,
    Authentication,
    Framework,
    Security,
    Monitoring,
}

impl SlotId {
    pub fn all() -> &'static [SlotId] {
        &[
            SlotId::Deployment,
            SlotId::Database,
            SlotId::Storage,
            SlotId::Messaging,
            SlotId::Authentication,
            SlotId::Framework,
            SlotId::Security,
            SlotId::Monitoring,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SlotId::Deployment => "deployment",
            SlotId::Database => "database",
            SlotId::Storage => "storage",
            SlotId::Messaging => "messaging",
            SlotId::Authentication => "authentication",
            SlotId::Framework => "framework",
            SlotId::Security => "security",
            SlotId::Monitoring => "monitoring",
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Capability / CapabilityModel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub configured: bool,
    /// The credential would allow configuring this capability even though
    /// no artifact does yet ("database:edit" grants database access).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub possible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// Built fresh on every discovery run; never persisted as a source of
/// truth. A manifest on disk is cross-checked against it, not merged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityModel {
    slots: BTreeMap<SlotId, Capability>,
}

impl Default for CapabilityModel {
    /// Every slot present, nothing configured.
    fn default() -> Self {
        let slots = SlotId::all()
            .iter()
            .map(|&id| (id, Capability::default()))
            .collect();
        Self { slots }
    }
}

impl CapabilityModel {
    pub fn slot(&self, id: SlotId) -> Capability {
        self.slots.get(&id).cloned().unwrap_or_default()
    }

    pub fn set_slot(&mut self, id: SlotId, capability: Capability) {
        self.slots.insert(id, capability);
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, Capability)> + '_ {
        SlotId::all().iter().map(|&id| (id, self.slot(id)))
    }

    pub fn configured(&self, id: SlotId) -> bool {
        self.slot(id).configured
    }
}

// ---------------------------------------------------------------------------
// Analyses & precedence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    DeploymentDescriptor,
    DependencyManifest,
    DirectoryLayout,
    CredentialPermissions,
}

/// Fixed merge precedence: per slot field, the first contributing analysis
/// wins and later ones only fill gaps. Declared explicitly so the result
/// is independent of completion order.
pub const ANALYSIS_PRECEDENCE: [Analysis; 4] = [
    Analysis::DeploymentDescriptor,
    Analysis::DependencyManifest,
    Analysis::DirectoryLayout,
    Analysis::CredentialPermissions,
];

#[derive(Debug, Clone, Default)]
struct SlotContribution {
    configured: Option<bool>,
    possible: Option<bool>,
    provider: Option<String>,
    quantity: Option<u32>,
}

type PartialCapabilities = BTreeMap<SlotId, SlotContribution>;

// ---------------------------------------------------------------------------
// Declarative mapping tables
// ---------------------------------------------------------------------------

/// Dependency name → framework provider.
const FRAMEWORK_DEPENDENCIES: &[(&str, &str)] = &[
    ("hono", "hono"),
    ("itty-router", "itty-router"),
    ("worktop", "worktop"),
    ("express", "express"),
];

/// Dependency name → authentication provider.
const AUTH_DEPENDENCIES: &[(&str, &str)] =
    &[("jose", "jose"), ("jsonwebtoken", "jsonwebtoken")];

/// Dependency name → monitoring provider.
const MONITORING_DEPENDENCIES: &[(&str, &str)] =
    &[("@sentry/cloudflare", "sentry"), ("@sentry/node", "sentry")];

/// Dependency names that hint at a database without configuring one.
const DATABASE_HINT_DEPENDENCIES: &[&str] = &["drizzle-orm", "knex", "kysely"];

/// Permission-string scope → slot the credential could configure.
const PERMISSION_RULES: &[(&str, SlotId)] = &[
    ("workers", SlotId::Deployment),
    ("database", SlotId::Database),
    ("d1", SlotId::Database),
    ("kv", SlotId::Storage),
    ("r2", SlotId::Storage),
    ("queues", SlotId::Messaging),
    ("access", SlotId::Authentication),
];

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Discover capabilities from artifacts alone (no credential lookup).
pub fn discover(root: &Path) -> CapabilityModel {
    discover_with(root, &NoopProbe)
}

/// Discover capabilities, additionally consulting a credential probe for
/// the permission analysis. Never errors.
pub fn discover_with(root: &Path, probe: &dyn CredentialProbe) -> CapabilityModel {
    if !root.is_dir() {
        tracing::debug!(path = %root.display(), "discovery target is not a directory");
        return CapabilityModel::default();
    }

    // The four analyses are read-only over disjoint artifacts; run them
    // concurrently. A panicked analysis degrades to no contribution.
    let parts = std::thread::scope(|s| {
        let descriptor = s.spawn(|| analyze_deployment_descriptor(root));
        let dependencies = s.spawn(|| analyze_dependency_manifest(root));
        let layout = s.spawn(|| analyze_directory_layout(root));
        let permissions = s.spawn(|| analyze_credential_permissions(probe));
        [
            descriptor.join().unwrap_or_default(),
            dependencies.join().unwrap_or_default(),
            layout.join().unwrap_or_default(),
            permissions.join().unwrap_or_default(),
        ]
    });
    merge(parts)
}

/// Fold contributions in `ANALYSIS_PRECEDENCE` order: the first analysis
/// to contribute a slot field wins, later ones only fill gaps.
fn merge(parts: [PartialCapabilities; 4]) -> CapabilityModel {
    let mut folded: PartialCapabilities = BTreeMap::new();
    for part in parts {
        for (slot, contribution) in part {
            let entry = folded.entry(slot).or_default();
            if entry.configured.is_none() {
                entry.configured = contribution.configured;
            }
            if entry.possible.is_none() {
                entry.possible = contribution.possible;
            }
            if entry.provider.is_none() {
                entry.provider = contribution.provider;
            }
            if entry.quantity.is_none() {
                entry.quantity = contribution.quantity;
            }
        }
    }

    let mut model = CapabilityModel::default();
    for &slot in SlotId::all() {
        let c = folded.remove(&slot).unwrap_or_default();
        model.set_slot(
            slot,
            Capability {
                configured: c.configured.unwrap_or(false),
                possible: c.possible.unwrap_or(false),
                provider: c.provider,
                quantity: c.quantity,
            },
        );
    }
    model
}

// ---------------------------------------------------------------------------
// Analysis 1: deployment descriptor
// ---------------------------------------------------------------------------

fn analyze_deployment_descriptor(root: &Path) -> PartialCapabilities {
    let mut out = PartialCapabilities::new();
    let path = paths::wrangler_path(root);
    let Ok(raw) = std::fs::read_to_string(&path) else {
        manifest_hint(root, &mut out);
        return out;
    };
    let doc: toml::Value = match toml::from_str(&raw) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!(error = %e, "deployment descriptor does not parse");
            manifest_hint(root, &mut out);
            return out;
        }
    };

    if doc.get("name").and_then(|v| v.as_str()).is_some() {
        let c = out.entry(SlotId::Deployment).or_default();
        c.configured = Some(true);
        c.provider = Some("workers".to_string());
    }

    let kv = binding_count(&doc, "kv_namespaces");
    let r2 = binding_count(&doc, "r2_buckets");
    if kv + r2 >= 1 {
        let c = out.entry(SlotId::Storage).or_default();
        c.configured = Some(true);
        c.quantity = Some(kv + r2);
        c.provider = Some(if kv >= 1 { "kv" } else { "r2" }.to_string());
    }

    let d1 = binding_count(&doc, "d1_databases");
    if d1 >= 1 {
        let c = out.entry(SlotId::Database).or_default();
        c.configured = Some(true);
        c.quantity = Some(d1);
        c.provider = Some("d1".to_string());
    }

    let producers = doc
        .get("queues")
        .and_then(|q| q.get("producers"))
        .and_then(|v| v.as_array())
        .map(|a| a.len() as u32)
        .unwrap_or(0);
    let consumers = doc
        .get("queues")
        .and_then(|q| q.get("consumers"))
        .and_then(|v| v.as_array())
        .map(|a| a.len() as u32)
        .unwrap_or(0);
    if producers + consumers >= 1 {
        let c = out.entry(SlotId::Messaging).or_default();
        c.configured = Some(true);
        c.quantity = Some(producers + consumers);
        c.provider = Some("queues".to_string());
    }

    if let Some(vars) = doc.get("vars").and_then(|v| v.as_table()) {
        if vars.contains_key("AUTH_ISSUER") || vars.contains_key("JWT_SECRET") {
            let c = out.entry(SlotId::Authentication).or_default();
            c.configured = Some(true);
            c.provider = Some("jwt".to_string());
        }
        if vars.contains_key("CORS_ORIGIN") {
            let c = out.entry(SlotId::Security).or_default();
            c.configured = Some(true);
            c.provider = Some("cors".to_string());
        }
    }

    let observability = doc
        .get("observability")
        .and_then(|o| o.get("enabled"))
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if observability {
        let c = out.entry(SlotId::Monitoring).or_default();
        c.configured = Some(true);
        c.provider = Some("workers-logs".to_string());
    }

    out
}

/// A manifest without a readable descriptor is a hint that the project was
/// generated for deployment — a hint only, never `configured`.
fn manifest_hint(root: &Path, out: &mut PartialCapabilities) {
    if paths::manifest_path(root).exists() {
        out.entry(SlotId::Deployment).or_default().possible = Some(true);
    }
}

fn binding_count(doc: &toml::Value, key: &str) -> u32 {
    doc.get(key)
        .and_then(|v| v.as_array())
        .map(|a| a.len() as u32)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Analysis 2: dependency manifest
// ---------------------------------------------------------------------------

fn analyze_dependency_manifest(root: &Path) -> PartialCapabilities {
    let mut out = PartialCapabilities::new();
    let path = paths::package_json_path(root);
    let Ok(raw) = std::fs::read_to_string(&path) else {
        return out;
    };
    let doc: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!(error = %e, "dependency manifest does not parse");
            return out;
        }
    };

    let has = |name: &str| -> bool {
        doc["dependencies"].get(name).is_some() || doc["devDependencies"].get(name).is_some()
    };

    for &(dep, provider) in FRAMEWORK_DEPENDENCIES {
        if has(dep) {
            let c = out.entry(SlotId::Framework).or_default();
            c.configured = Some(true);
            c.provider = Some(provider.to_string());
            break;
        }
    }

    if has("wrangler") {
        let c = out.entry(SlotId::Deployment).or_default();
        c.configured = Some(true);
        c.provider = Some("wrangler".to_string());
    }

    for &(dep, provider) in AUTH_DEPENDENCIES {
        if has(dep) {
            let c = out.entry(SlotId::Authentication).or_default();
            c.configured = Some(true);
            c.provider = Some(provider.to_string());
            break;
        }
    }

    for &(dep, provider) in MONITORING_DEPENDENCIES {
        if has(dep) {
            let c = out.entry(SlotId::Monitoring).or_default();
            c.configured = Some(true);
            c.provider = Some(provider.to_string());
            break;
        }
    }

    if DATABASE_HINT_DEPENDENCIES.iter().copied().any(|d| has(d)) {
        out.entry(SlotId::Database).or_default().possible = Some(true);
    }

    out
}

// ---------------------------------------------------------------------------
// Analysis 3: directory layout
// ---------------------------------------------------------------------------

fn analyze_directory_layout(root: &Path) -> PartialCapabilities {
    let mut out = PartialCapabilities::new();

    if root.join("src/index.ts").exists() || root.join("src/index.js").exists() {
        out.entry(SlotId::Framework).or_default().possible = Some(true);
    }
    if root.join("migrations").is_dir() {
        out.entry(SlotId::Database).or_default().possible = Some(true);
    }
    if root.join("src/auth").is_dir() || root.join("src/middleware/auth.ts").exists() {
        out.entry(SlotId::Authentication).or_default().possible = Some(true);
    }

    out
}

// ---------------------------------------------------------------------------
// Analysis 4: credential permissions
// ---------------------------------------------------------------------------

fn analyze_credential_permissions(probe: &dyn CredentialProbe) -> PartialCapabilities {
    let mut out = PartialCapabilities::new();
    let status = probe.probe();
    if !status.available {
        return out;
    }
    for permission in &status.permissions {
        let scope = permission.split(':').next().unwrap_or("");
        for &(prefix, slot) in PERMISSION_RULES {
            if scope == prefix {
                out.entry(slot).or_default().possible = Some(true);
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
