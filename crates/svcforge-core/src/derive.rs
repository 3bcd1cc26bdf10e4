//! Derivation of the fifteen confirmable configuration values from the
//! seven core inputs.
//!
//! `derive` is pure and total: every id receives a value for any validated
//! `CoreInputs`. Overrides re-validate per field; a rejected override keeps
//! the previous value. There is no cascading recomputation — overriding
//! `domain_name`-derived fields does not touch their siblings.

use crate::error::{ForgeError, Result};
use crate::inputs::{CoreInputs, Environment};
use crate::validate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// DerivedId
// ---------------------------------------------------------------------------

/// The closed set of derived values. No id may be invented ad hoc.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DerivedId {
    DisplayName,
    WorkerName,
    ProductionUrl,
    StagingUrl,
    DevelopmentUrl,
    RoutePattern,
    ApiBasePath,
    HealthPath,
    KvNamespace,
    D1Database,
    R2Bucket,
    QueueName,
    AuthIssuer,
    CorsOrigin,
    LogLevel,
}

impl DerivedId {
    pub fn all() -> &'static [DerivedId] {
        &[
            DerivedId::DisplayName,
            DerivedId::WorkerName,
            DerivedId::ProductionUrl,
            DerivedId::StagingUrl,
            DerivedId::DevelopmentUrl,
            DerivedId::RoutePattern,
            DerivedId::ApiBasePath,
            DerivedId::HealthPath,
            DerivedId::KvNamespace,
            DerivedId::D1Database,
            DerivedId::R2Bucket,
            DerivedId::QueueName,
            DerivedId::AuthIssuer,
            DerivedId::CorsOrigin,
            DerivedId::LogLevel,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DerivedId::DisplayName => "display_name",
            DerivedId::WorkerName => "worker_name",
            DerivedId::ProductionUrl => "production_url",
            DerivedId::StagingUrl => "staging_url",
            DerivedId::DevelopmentUrl => "development_url",
            DerivedId::RoutePattern => "route_pattern",
            DerivedId::ApiBasePath => "api_base_path",
            DerivedId::HealthPath => "health_path",
            DerivedId::KvNamespace => "kv_namespace",
            DerivedId::D1Database => "d1_database",
            DerivedId::R2Bucket => "r2_bucket",
            DerivedId::QueueName => "queue_name",
            DerivedId::AuthIssuer => "auth_issuer",
            DerivedId::CorsOrigin => "cors_origin",
            DerivedId::LogLevel => "log_level",
        }
    }
}

impl fmt::Display for DerivedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DerivedId {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        DerivedId::all()
            .iter()
            .find(|id| id.as_str() == s)
            .copied()
            .ok_or_else(|| ForgeError::InvalidInput {
                field: "derived_id",
                reason: format!("'{s}' is not a derived value"),
            })
    }
}

// ---------------------------------------------------------------------------
// DerivedValue / UserModification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedValue {
    pub default: String,
    pub current: String,
    pub user_modified: bool,
}

/// One accepted override, recorded for transparency reporting. The log is
/// informational only and never feeds back into derivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserModification {
    pub field: DerivedId,
    pub assumed: String,
    pub chosen: String,
}

// ---------------------------------------------------------------------------
// DerivedValues
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedValues {
    values: BTreeMap<DerivedId, DerivedValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modifications: Vec<UserModification>,
}

impl DerivedValues {
    pub fn get(&self, id: DerivedId) -> &DerivedValue {
        // derive() populates every id; the map is total by construction.
        &self.values[&id]
    }

    /// Current value (default unless overridden).
    pub fn value(&self, id: DerivedId) -> &str {
        &self.get(id).current
    }

    pub fn iter(&self) -> impl Iterator<Item = (DerivedId, &DerivedValue)> {
        self.values.iter().map(|(id, v)| (*id, v))
    }

    pub fn modifications(&self) -> &[UserModification] {
        &self.modifications
    }

    pub fn into_parts(self) -> (BTreeMap<DerivedId, DerivedValue>, Vec<UserModification>) {
        (self.values, self.modifications)
    }

    /// Apply an operator override. The replacement is re-validated with the
    /// field's own validator; an invalid replacement keeps the previous
    /// value and reports why. Accepted deviations from the computed default
    /// are appended to the modification log.
    pub fn apply_override(&mut self, id: DerivedId, replacement: &str) -> Result<()> {
        let replacement = replacement.trim();
        if let Err(reason) = check_override(id, replacement) {
            return Err(ForgeError::OverrideRejected {
                field: id.as_str(),
                reason,
            });
        }
        let entry = self.values.get_mut(&id).expect("all ids derived");
        if replacement != entry.default {
            self.modifications.push(UserModification {
                field: id,
                assumed: entry.default.clone(),
                chosen: replacement.to_string(),
            });
        }
        entry.current = replacement.to_string();
        entry.user_modified = entry.current != entry.default;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Compute a default for every derived id. Pure and total: any failure here
/// for validated inputs is a defect, not a runtime error.
pub fn derive(inputs: &CoreInputs) -> DerivedValues {
    let values = DerivedId::all()
        .iter()
        .map(|&id| {
            let default = default_for(id, inputs);
            (
                id,
                DerivedValue {
                    current: default.clone(),
                    default,
                    user_modified: false,
                },
            )
        })
        .collect();
    DerivedValues {
        values,
        modifications: Vec::new(),
    }
}

fn default_for(id: DerivedId, inputs: &CoreInputs) -> String {
    let slug = &inputs.service_name;
    let domain = &inputs.domain_name;
    match id {
        DerivedId::DisplayName => title_case(slug),
        DerivedId::WorkerName => worker_name(inputs),
        DerivedId::ProductionUrl => format!("https://{slug}.{domain}"),
        DerivedId::StagingUrl => format!("https://{slug}-staging.{domain}"),
        DerivedId::DevelopmentUrl => "http://localhost:8787".to_string(),
        DerivedId::RoutePattern => format!("{slug}.{domain}/*"),
        DerivedId::ApiBasePath => "/api/v1".to_string(),
        DerivedId::HealthPath => "/health".to_string(),
        DerivedId::KvNamespace => format!("{}_CACHE", upper_snake(slug)),
        DerivedId::D1Database => format!("{slug}-db"),
        DerivedId::R2Bucket => format!("{slug}-assets"),
        DerivedId::QueueName => format!("{slug}-jobs"),
        DerivedId::AuthIssuer => format!("https://auth.{domain}"),
        DerivedId::CorsOrigin => format!("https://{domain}"),
        DerivedId::LogLevel => match inputs.environment {
            Environment::Production => "warn",
            Environment::Staging => "info",
            Environment::Development => "debug",
        }
        .to_string(),
    }
}

/// Worker resource name: production deploys under the bare slug; other
/// environments get a suffix. Truncated to the platform's 54-char limit.
fn worker_name(inputs: &CoreInputs) -> String {
    let name = match inputs.environment {
        Environment::Production => inputs.service_name.clone(),
        env => format!("{}-{}", inputs.service_name, env.as_str()),
    };
    let mut name: String = name.chars().take(54).collect();
    while name.ends_with('-') {
        name.pop();
    }
    name
}

fn title_case(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn upper_snake(slug: &str) -> String {
    slug.replace('-', "_").to_uppercase()
}

// ---------------------------------------------------------------------------
// Override validators
// ---------------------------------------------------------------------------

fn check_override(id: DerivedId, value: &str) -> std::result::Result<(), String> {
    let ok = match id {
        DerivedId::DisplayName => !value.is_empty() && value.len() <= 100,
        DerivedId::WorkerName
        | DerivedId::D1Database
        | DerivedId::R2Bucket
        | DerivedId::QueueName => validate::is_resource_name(value),
        DerivedId::KvNamespace => validate::is_binding_name(value),
        DerivedId::ProductionUrl
        | DerivedId::StagingUrl
        | DerivedId::DevelopmentUrl
        | DerivedId::AuthIssuer
        | DerivedId::CorsOrigin => validate::is_http_url(value),
        DerivedId::ApiBasePath | DerivedId::HealthPath => validate::is_absolute_path(value),
        DerivedId::RoutePattern => validate::is_route_pattern(value),
        DerivedId::LogLevel => validate::is_log_level(value),
    };
    if ok {
        Ok(())
    } else {
        Err(rejection_reason(id))
    }
}

fn rejection_reason(id: DerivedId) -> String {
    match id {
        DerivedId::DisplayName => "must be 1-100 characters",
        DerivedId::WorkerName
        | DerivedId::D1Database
        | DerivedId::R2Bucket
        | DerivedId::QueueName => "must be a lowercase resource name (max 54 chars)",
        DerivedId::KvNamespace => "must be an UPPER_SNAKE_CASE binding name",
        DerivedId::ProductionUrl
        | DerivedId::StagingUrl
        | DerivedId::DevelopmentUrl
        | DerivedId::AuthIssuer
        | DerivedId::CorsOrigin => "must be an http(s) URL with a host",
        DerivedId::ApiBasePath | DerivedId::HealthPath => "must start with '/'",
        DerivedId::RoutePattern => "must be a host pattern like service.example.com/*",
        DerivedId::LogLevel => "must be one of error, warn, info, debug",
    }
    .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
