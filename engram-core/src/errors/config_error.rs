/// Configuration errors. Raised at engine construction, never mid-query.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    #[error("failed to read config file {path}: {reason}")]
    ReadFailed { path: String, reason: String },
}

impl ConfigError {
    /// Shorthand for the common validation-failure case.
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
