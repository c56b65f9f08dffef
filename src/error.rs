use thiserror::Error;

pub type Result<T> = std::result::Result<T, TakError>;

#[derive(Error, Debug)]
pub enum TakError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Non-2xx answer from the TAK API.
    #[error("[{status}] {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid deal: {0}")]
    InvalidDeal(String),

    #[error("{0}")]
    Adapter(String),

    #[error("{0}")]
    NotImplemented(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl TakError {
    /// HTTP status carried by an API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TakError::Api { status, .. } => Some(*status),
            TakError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TakError {
    fn from(err: serde_json::Error) -> Self {
        TakError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for TakError {
    fn from(err: toml::de::Error) -> Self {
        TakError::Config(format!("Failed to parse config file: {}", err))
    }
}

impl From<toml::ser::Error> for TakError {
    fn from(err: toml::ser::Error) -> Self {
        TakError::Config(format!("Failed to serialize config: {}", err))
    }
}

impl From<std::io::Error> for TakError {
    fn from(err: std::io::Error) -> Self {
        TakError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_renders_status_and_message() {
        let err = TakError::Api {
            status: 404,
            message: "Deal not found".to_string(),
        };
        assert_eq!(err.to_string(), "[404] Deal not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn non_api_errors_have_no_status() {
        assert_eq!(TakError::InvalidInput("x".into()).status(), None);
    }
}
