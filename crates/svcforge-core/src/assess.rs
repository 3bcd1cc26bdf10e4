//! Maturity assessment over a discovered capability model.
//!
//! Only the required slots (deployment, framework) move the completeness
//! score; optional capabilities feed recommendations so a service that
//! legitimately needs no database is not penalized for lacking one.

use crate::discover::{CapabilityModel, SlotId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slots every service needs regardless of type.
pub const REQUIRED_SLOTS: &[SlotId] = &[SlotId::Deployment, SlotId::Framework];

/// Recommendations are capped to keep the report actionable.
pub const MAX_RECOMMENDATIONS: usize = 5;

// ---------------------------------------------------------------------------
// Maturity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maturity {
    Basic,
    Developing,
    Mature,
}

impl Maturity {
    pub fn from_completeness(completeness: u32) -> Self {
        match completeness {
            80.. => Maturity::Mature,
            50..=79 => Maturity::Developing,
            _ => Maturity::Basic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Maturity::Basic => "basic",
            Maturity::Developing => "developing",
            Maturity::Mature => "mature",
        }
    }
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// Priority buckets, lowest first so the derived order sorts ascending.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Enhancement,
    Setup,
    Security,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Enhancement => "enhancement",
            Priority::Setup => "setup",
            Priority::Security => "security",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub slot: SlotId,
    pub message: String,
}

// ---------------------------------------------------------------------------
// AssessmentResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Required-capability coverage, 0-100.
    pub completeness: u32,
    pub maturity: Maturity,
    pub missing_capabilities: Vec<SlotId>,
    pub recommendations: Vec<Recommendation>,
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

pub fn assess(model: &CapabilityModel) -> AssessmentResult {
    let configured_required = REQUIRED_SLOTS
        .iter()
        .filter(|&&slot| model.configured(slot))
        .count();
    let completeness =
        ((configured_required as f64 / REQUIRED_SLOTS.len() as f64) * 100.0).round() as u32;

    let missing_capabilities = REQUIRED_SLOTS
        .iter()
        .copied()
        .filter(|&slot| !model.configured(slot))
        .collect();

    AssessmentResult {
        completeness,
        maturity: Maturity::from_completeness(completeness),
        missing_capabilities,
        recommendations: recommend(model),
    }
}

/// Fixed rules keyed on model state, evaluated in slot declaration order,
/// then sorted by priority (security first) and capped. Ties keep slot
/// declaration order, so output is deterministic.
fn recommend(model: &CapabilityModel) -> Vec<Recommendation> {
    let mut out = Vec::new();
    let mut push = |priority: Priority, slot: SlotId, message: &str| {
        out.push(Recommendation {
            priority,
            slot,
            message: message.to_string(),
        });
    };

    for (slot, capability) in model.iter() {
        if capability.configured {
            continue;
        }
        match slot {
            SlotId::Deployment => push(
                Priority::Setup,
                slot,
                "add a deployment descriptor (wrangler.toml) so the service can ship",
            ),
            SlotId::Framework => push(
                Priority::Setup,
                slot,
                "add a web framework dependency to the package manifest",
            ),
            SlotId::Security => push(
                Priority::Security,
                slot,
                "configure CORS and security headers in the deployment vars",
            ),
            SlotId::Authentication => push(
                Priority::Enhancement,
                slot,
                "no authentication is configured; add one if the service exposes private routes",
            ),
            SlotId::Database if capability.possible => push(
                Priority::Enhancement,
                slot,
                "the credential grants database access; bind a database if the service stores state",
            ),
            SlotId::Monitoring => push(
                Priority::Enhancement,
                slot,
                "enable observability so production issues are visible",
            ),
            SlotId::Database | SlotId::Storage | SlotId::Messaging => {}
        }
    }

    // Stable sort keeps declaration order within a priority bucket.
    out.sort_by_key(|r| std::cmp::Reverse(r.priority));
    out.truncate(MAX_RECOMMENDATIONS);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
