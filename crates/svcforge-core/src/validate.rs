//! Pure predicate functions for input and override validation.
//!
//! Every function here is total and side-effect free; callers decide what a
//! `false` means (re-prompt, reject an override, collect a violation).

use regex::Regex;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();
static DNS_RE: OnceLock<Regex> = OnceLock::new();
static HEX_ID_RE: OnceLock<Regex> = OnceLock::new();
static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
static RESOURCE_RE: OnceLock<Regex> = OnceLock::new();
static BINDING_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    // 3-50 chars, lowercase alphanumeric with interior hyphens
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,48}[a-z0-9]$").unwrap())
}

fn dns_re() -> &'static Regex {
    DNS_RE.get_or_init(|| {
        Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,24}$").unwrap()
    })
}

fn hex_id_re() -> &'static Regex {
    HEX_ID_RE.get_or_init(|| Regex::new(r"^[0-9a-f]{32}$").unwrap())
}

fn token_re() -> &'static Regex {
    TOKEN_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{40}$").unwrap())
}

fn resource_re() -> &'static Regex {
    // Platform resource names: lowercase, digits, hyphens, max 54 chars
    RESOURCE_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]{0,53}$").unwrap())
}

fn binding_re() -> &'static Regex {
    // Binding identifiers surface as env members in worker code
    BINDING_RE.get_or_init(|| Regex::new(r"^[A-Z][A-Z0-9_]{0,63}$").unwrap())
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Service slug: 3-50 chars, lowercase alphanumeric and hyphens,
/// no leading or trailing hyphen.
pub fn is_slug(s: &str) -> bool {
    slug_re().is_match(s) && !s.contains("--")
}

/// DNS name: dotted lowercase labels, alphabetic TLD, total length <= 253.
pub fn is_dns_name(s: &str) -> bool {
    s.len() <= 253 && dns_re().is_match(s)
}

/// Fixed-length platform identifier: 32 lowercase hex chars.
pub fn is_hex_id(s: &str) -> bool {
    hex_id_re().is_match(s)
}

/// Opaque API token shape: exactly 40 chars of [A-Za-z0-9_-].
pub fn is_api_token(s: &str) -> bool {
    token_re().is_match(s)
}

/// URL with an http or https scheme and a non-empty host.
pub fn is_http_url(s: &str) -> bool {
    let rest = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"));
    match rest {
        Some(r) => {
            let host = r.split('/').next().unwrap_or("");
            !host.is_empty() && !host.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Path rooted at `/`, no whitespace.
pub fn is_absolute_path(s: &str) -> bool {
    s.starts_with('/') && !s.contains(char::is_whitespace)
}

/// Platform resource name (worker, database, bucket, queue).
pub fn is_resource_name(s: &str) -> bool {
    resource_re().is_match(s) && !s.ends_with('-')
}

/// Binding identifier as it appears in worker env (upper snake case).
pub fn is_binding_name(s: &str) -> bool {
    binding_re().is_match(s)
}

/// Route pattern: host with at least one dot, optional path/wildcard suffix.
pub fn is_route_pattern(s: &str) -> bool {
    let host = s.split('/').next().unwrap_or("");
    !s.starts_with('/') && host.contains('.') && !s.contains(char::is_whitespace)
}

/// One of the accepted log levels.
pub fn is_log_level(s: &str) -> bool {
    matches!(s, "error" | "warn" | "info" | "debug")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
