use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
