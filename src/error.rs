use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Covers both transport failures and bodies that are not valid JSON.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Invalid {field}: '{value}'. Valid values: {expected}")]
    InvalidOption {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Self::Config(s) => Self::Config(s.clone()),
            Self::InvalidOption {
                field,
                value,
                expected,
            } => Self::InvalidOption {
                field: *field,
                value: value.clone(),
                expected: *expected,
            },
            Self::Internal(s) => Self::Internal(s.clone()),
            // Wrapped library errors are not Clone; keep their message
            Self::Request(e) => Self::Internal(format!("Request failed: {}", e)),
            Self::Serialization(e) => Self::Internal(format!("Serialization error: {}", e)),
            Self::Yaml(e) => Self::Internal(format!("YAML error: {}", e)),
            Self::Io(e) => Self::Internal(format!("IO error: {}", e)),
            Self::AddrParse(e) => Self::Internal(format!("Address parse error: {}", e)),
        }
    }
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True for the single failure kind a generation can observe.
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}
