use crate::error::{ForgeError, Result};
use crate::validate;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// ServiceType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    DataService,
    AuthService,
    ContentService,
    ApiGateway,
    Generic,
}

impl ServiceType {
    pub fn all() -> &'static [ServiceType] {
        &[
            ServiceType::DataService,
            ServiceType::AuthService,
            ServiceType::ContentService,
            ServiceType::ApiGateway,
            ServiceType::Generic,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::DataService => "data-service",
            ServiceType::AuthService => "auth-service",
            ServiceType::ContentService => "content-service",
            ServiceType::ApiGateway => "api-gateway",
            ServiceType::Generic => "generic",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceType {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "data-service" => Ok(ServiceType::DataService),
            "auth-service" => Ok(ServiceType::AuthService),
            "content-service" => Ok(ServiceType::ContentService),
            "api-gateway" => Ok(ServiceType::ApiGateway),
            "generic" => Ok(ServiceType::Generic),
            _ => Err(ForgeError::InvalidInput {
                field: "service_type",
                reason: format!(
                    "'{s}' is not one of data-service, auth-service, content-service, api-gateway, generic"
                ),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn all() -> &'static [Environment] {
        &[
            Environment::Development,
            Environment::Staging,
            Environment::Production,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            _ => Err(ForgeError::InvalidInput {
                field: "environment",
                reason: format!("'{s}' is not one of development, staging, production"),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// ApiCredential
// ---------------------------------------------------------------------------

/// Opaque platform API token. Shape-validated on construction and never
/// echoed in full: Debug, Display, and Serialize all emit the masked form.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct ApiCredential(String);

impl ApiCredential {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if !validate::is_api_token(&raw) {
            return Err(ForgeError::InvalidInput {
                field: "api_credential",
                reason: "token must be exactly 40 chars of letters, digits, '_' or '-'"
                    .to_string(),
            });
        }
        Ok(Self(raw))
    }

    /// First four and last four characters, middle elided.
    pub fn masked(&self) -> String {
        let s = &self.0;
        if s.len() < 9 {
            return "\u{2026}".to_string();
        }
        format!("{}\u{2026}{}", &s[..4], &s[s.len() - 4..])
    }

    /// Full token, for the credential probe only. Callers must not log it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiCredential({})", self.masked())
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl Serialize for ApiCredential {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.masked())
    }
}

// ---------------------------------------------------------------------------
// InputViolation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct InputViolation {
    pub field: &'static str,
    pub reason: String,
}

impl fmt::Display for InputViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

// ---------------------------------------------------------------------------
// InputField
// ---------------------------------------------------------------------------

/// The seven collected fields, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    ServiceName,
    ServiceType,
    DomainName,
    ApiCredential,
    AccountId,
    ZoneId,
    Environment,
}

impl InputField {
    pub fn all() -> &'static [InputField] {
        &[
            InputField::ServiceName,
            InputField::ServiceType,
            InputField::DomainName,
            InputField::ApiCredential,
            InputField::AccountId,
            InputField::ZoneId,
            InputField::Environment,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InputField::ServiceName => "service_name",
            InputField::ServiceType => "service_type",
            InputField::DomainName => "domain_name",
            InputField::ApiCredential => "api_credential",
            InputField::AccountId => "account_id",
            InputField::ZoneId => "zone_id",
            InputField::Environment => "environment",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            InputField::ServiceName => "Service name (slug, e.g. billing-api)",
            InputField::ServiceType => {
                "Service type (data-service/auth-service/content-service/api-gateway/generic)"
            }
            InputField::DomainName => "Domain name (e.g. example.com)",
            InputField::ApiCredential => "Platform API token",
            InputField::AccountId => "Account ID (32 hex chars)",
            InputField::ZoneId => "Zone ID (32 hex chars)",
            InputField::Environment => "Environment (development/staging/production)",
        }
    }

    /// Check a single raw value, returning the rejection reason if invalid.
    pub fn check(self, raw: &str) -> Option<String> {
        match self {
            InputField::ServiceName if !validate::is_slug(raw) => Some(
                "must be 3-50 lowercase alphanumeric chars with single hyphens".to_string(),
            ),
            InputField::ServiceType => raw.parse::<ServiceType>().err().map(reason_of),
            InputField::DomainName if !validate::is_dns_name(raw) => {
                Some("must be a valid DNS name (e.g. example.com)".to_string())
            }
            InputField::ApiCredential => ApiCredential::new(raw).err().map(reason_of),
            InputField::AccountId if !validate::is_hex_id(raw) => {
                Some("must be 32 lowercase hex characters".to_string())
            }
            InputField::ZoneId if !validate::is_hex_id(raw) => {
                Some("must be 32 lowercase hex characters".to_string())
            }
            InputField::Environment => raw.parse::<Environment>().err().map(reason_of),
            _ => None,
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn reason_of(e: ForgeError) -> String {
    match e {
        ForgeError::InvalidInput { reason, .. } => reason,
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// RawCoreInputs / CoreInputs
// ---------------------------------------------------------------------------

/// Unvalidated field values, as collected from flags or prompts.
#[derive(Debug, Clone, Default)]
pub struct RawCoreInputs {
    pub service_name: String,
    pub service_type: String,
    pub domain_name: String,
    pub api_credential: String,
    pub account_id: String,
    pub zone_id: String,
    pub environment: String,
}

impl RawCoreInputs {
    pub fn field(&self, field: InputField) -> &str {
        match field {
            InputField::ServiceName => &self.service_name,
            InputField::ServiceType => &self.service_type,
            InputField::DomainName => &self.domain_name,
            InputField::ApiCredential => &self.api_credential,
            InputField::AccountId => &self.account_id,
            InputField::ZoneId => &self.zone_id,
            InputField::Environment => &self.environment,
        }
    }

    pub fn set_field(&mut self, field: InputField, value: String) {
        match field {
            InputField::ServiceName => self.service_name = value,
            InputField::ServiceType => self.service_type = value,
            InputField::DomainName => self.domain_name = value,
            InputField::ApiCredential => self.api_credential = value,
            InputField::AccountId => self.account_id = value,
            InputField::ZoneId => self.zone_id = value,
            InputField::Environment => self.environment = value,
        }
    }

    /// Check every field, returning all violations at once. Programmatic
    /// callers surface the whole list; interactive collection re-prompts
    /// per field instead.
    pub fn violations(&self) -> Vec<InputViolation> {
        let mut out = Vec::new();
        for &field in InputField::all() {
            if let Some(reason) = field.check(self.field(field)) {
                out.push(InputViolation {
                    field: field.as_str(),
                    reason,
                });
            }
        }
        out
    }

    /// Validate as a unit and build the immutable record.
    pub fn build(self) -> Result<CoreInputs> {
        let violations = self.violations();
        if !violations.is_empty() {
            return Err(ForgeError::InvalidInputs(violations));
        }
        Ok(CoreInputs {
            service_name: self.service_name,
            service_type: self.service_type.parse()?,
            domain_name: self.domain_name,
            api_credential: ApiCredential::new(self.api_credential)?,
            account_id: self.account_id,
            zone_id: self.zone_id,
            environment: self.environment.parse()?,
        })
    }
}

/// The seven required facts, validated as a unit and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreInputs {
    pub service_name: String,
    pub service_type: ServiceType,
    pub domain_name: String,
    pub api_credential: ApiCredential,
    pub account_id: String,
    pub zone_id: String,
    pub environment: Environment,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawCoreInputs {
        RawCoreInputs {
            service_name: "billing-api".into(),
            service_type: "data-service".into(),
            domain_name: "example.com".into(),
            api_credential: "a".repeat(40),
            account_id: "0123456789abcdef0123456789abcdef".into(),
            zone_id: "fedcba9876543210fedcba9876543210".into(),
            environment: "production".into(),
        }
    }

    #[test]
    fn valid_inputs_build() {
        let inputs = raw().build().unwrap();
        assert_eq!(inputs.service_name, "billing-api");
        assert_eq!(inputs.service_type, ServiceType::DataService);
        assert_eq!(inputs.environment, Environment::Production);
    }

    #[test]
    fn all_violations_reported_at_once() {
        let mut r = raw();
        r.service_name = "BAD NAME".into();
        r.account_id = "tooshort".into();
        r.environment = "prod".into();

        let violations = r.violations();
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["service_name", "account_id", "environment"]);

        match r.build() {
            Err(ForgeError::InvalidInputs(vs)) => assert_eq!(vs.len(), 3),
            other => panic!("expected InvalidInputs, got {other:?}"),
        }
    }

    #[test]
    fn credential_is_masked_everywhere() {
        let token = format!("abcd{}wxyz", "x".repeat(32));
        let cred = ApiCredential::new(token).unwrap();
        assert_eq!(cred.masked(), "abcd\u{2026}wxyz");
        assert_eq!(format!("{cred:?}"), "ApiCredential(abcd\u{2026}wxyz)");
        assert_eq!(cred.to_string(), "abcd\u{2026}wxyz");

        let json = serde_json::to_string(&cred).unwrap();
        assert!(!json.contains("xxxx"), "full token leaked: {json}");
        assert!(json.contains("abcd\u{2026}wxyz"));
    }

    #[test]
    fn credential_shape_enforced() {
        assert!(ApiCredential::new("short").is_err());
        assert!(ApiCredential::new("b".repeat(40)).is_ok());
        assert!(ApiCredential::new(format!("{}!", "b".repeat(39))).is_err());
    }

    #[test]
    fn service_type_roundtrip() {
        for &t in ServiceType::all() {
            assert_eq!(t.as_str().parse::<ServiceType>().unwrap(), t);
        }
    }

    #[test]
    fn environment_roundtrip() {
        for &e in Environment::all() {
            assert_eq!(e.as_str().parse::<Environment>().unwrap(), e);
        }
        assert!("prod".parse::<Environment>().is_err());
    }

    #[test]
    fn field_check_matches_collection_order() {
        assert_eq!(InputField::all().len(), 7);
        assert!(InputField::ServiceName.check("billing-api").is_none());
        assert!(InputField::ServiceName.check("x").is_some());
        assert!(InputField::Environment.check("staging").is_none());
    }
}
