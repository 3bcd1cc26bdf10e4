use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("invalid core inputs: {}", .0.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; "))]
    InvalidInputs(Vec<crate::inputs::InputViolation>),

    #[error("override rejected for {field}: {reason}")]
    OverrideRejected { field: &'static str, reason: String },

    #[error("unknown generator: {0}")]
    UnknownGenerator(String),

    #[error("duplicate generator: {0}")]
    DuplicateGenerator(String),

    #[error("generator dependency cycle involving '{0}'")]
    GeneratorCycle(String),

    #[error("generator '{name}' failed: {message}")]
    Generator { name: &'static str, message: String },

    #[error("target is not a directory: {0}")]
    TargetNotDirectory(String),

    #[error("service manifest not found at {0}")]
    ManifestNotFound(String),

    #[error("input collection ended after {attempts} attempts on {field}")]
    CollectionExhausted { field: &'static str, attempts: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
