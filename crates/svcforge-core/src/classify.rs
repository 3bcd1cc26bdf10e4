//! Error classification: severity and recovery suggestions from fixed
//! substring rules. The single authority both interactive and programmatic
//! callers consult, so recovery guidance stays consistent. Classification
//! only returns text; any retry or auto-fix is the caller's responsibility.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

// ---------------------------------------------------------------------------
// Context / result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The failing operation, when known ("create", "update", "generate").
    pub operation: Option<String>,
    /// The component that raised the error, when known.
    pub component: Option<String>,
}

impl ErrorContext {
    pub fn for_operation(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            component: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classified {
    pub severity: Severity,
    pub suggestions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// First-matching-rule wins: substrings checked against the lowercased
/// message, each rule carrying its own recovery catalog.
const PATTERN_RULES: &[(&[&str], Severity, &[&str])] = &[
    (
        &["authentication", "unauthorized", "permission", "forbidden"],
        Severity::Critical,
        &[
            "verify the API credential is valid and has not expired",
            "check that the token grants the permissions this operation needs",
            "confirm the account and zone identifiers belong to this credential",
        ],
    ),
    (
        &["network", "timeout", "connection", "validation"],
        Severity::High,
        &[
            "retry after checking connectivity to the platform API",
            "re-run input validation and correct the reported fields",
        ],
    ),
    (
        &["deprecated", "not found"],
        Severity::Medium,
        &[
            "check the resource name against what the platform reports",
            "update to a supported API version or resource kind",
        ],
    ),
];

const FALLBACK_SUGGESTION: &str = "re-run with RUST_LOG=debug for a detailed trace";

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

pub fn classify(message: &str, context: &ErrorContext) -> Classified {
    let lower = message.to_lowercase();

    let (severity, catalog) = PATTERN_RULES
        .iter()
        .find(|(patterns, _, _)| patterns.iter().any(|p| lower.contains(p)))
        .map(|(_, severity, catalog)| (*severity, *catalog))
        .unwrap_or((Severity::Low, &[][..]));

    let mut suggestions: Vec<String> = catalog.iter().map(|s| s.to_string()).collect();
    match context.operation.as_deref() {
        Some("create") => suggestions
            .push("check whether the resource already exists before creating it".to_string()),
        Some("update") => {
            suggestions.push("confirm the resource exists before updating it".to_string())
        }
        _ => {}
    }
    if let Some(component) = &context.component {
        suggestions.push(format!("the failure originated in '{component}'"));
    }
    if suggestions.is_empty() {
        suggestions.push(FALLBACK_SUGGESTION.to_string());
    }

    Classified {
        severity,
        suggestions,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
