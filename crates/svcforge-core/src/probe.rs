//! Credential verification seam.
//!
//! Verifying a token against the platform is an external, best-effort
//! concern: it runs with a hard timeout and degrades to "unavailable" on
//! any failure. Nothing in generation or discovery hard-depends on it.

use crate::inputs::ApiCredential;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_VERIFY_ENDPOINT: &str =
    "https://api.cloudflare.com/client/v4/user/tokens/verify";
const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// TokenStatus / CredentialProbe
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TokenStatus {
    pub available: bool,
    pub permissions: Vec<String>,
}

/// `Sync` so discovery can consult the probe from its analysis threads.
pub trait CredentialProbe: Sync {
    fn probe(&self) -> TokenStatus;
}

/// Probe used when no credential is supplied or verification is not
/// wanted: contributes nothing, so discovery stays fully offline-capable.
pub struct NoopProbe;

impl CredentialProbe for NoopProbe {
    fn probe(&self) -> TokenStatus {
        TokenStatus::default()
    }
}

// ---------------------------------------------------------------------------
// HttpTokenProbe
// ---------------------------------------------------------------------------

pub struct HttpTokenProbe {
    endpoint: String,
    credential: ApiCredential,
}

impl HttpTokenProbe {
    pub fn new(credential: ApiCredential) -> Self {
        Self {
            endpoint: DEFAULT_VERIFY_ENDPOINT.to_string(),
            credential,
        }
    }

    pub fn with_endpoint(credential: ApiCredential, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credential,
        }
    }

    fn verify(&self) -> std::result::Result<TokenStatus, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(VERIFY_TIMEOUT)
            .build()?;
        let body: Value = client
            .get(&self.endpoint)
            .bearer_auth(self.credential.expose())
            .send()?
            .error_for_status()?
            .json()?;
        Ok(parse_token_status(&body))
    }
}

impl CredentialProbe for HttpTokenProbe {
    fn probe(&self) -> TokenStatus {
        match self.verify() {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!(error = %e, "token verification degraded to unavailable");
                TokenStatus::default()
            }
        }
    }
}

/// Pull token state and granted permission strings out of a verify
/// response. Unknown shapes degrade to an unavailable token.
pub fn parse_token_status(body: &Value) -> TokenStatus {
    let result = &body["result"];
    let active = result["status"].as_str() == Some("active");
    if !active {
        return TokenStatus::default();
    }
    let permissions = result["permissions"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|p| p.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    TokenStatus {
        available: true,
        permissions,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
