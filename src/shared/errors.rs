//! Error handling for the application

use thiserror::Error;

/// Price feed errors. Every variant is recoverable: the cycle is skipped.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    #[error("Asset '{0}' not found in provider response")]
    AssetNotFound(String),

    #[error("Malformed provider response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return FetchError::Http { status: status.as_u16() };
        }
        if err.is_decode() {
            return FetchError::Parse(err.to_string());
        }
        FetchError::Network(err.to_string())
    }
}

/// Notification channel errors. Never fatal; sibling channels still run.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Email credentials are not configured (missing: {})", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("Invalid email address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),

    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Email build error: {0}")]
    Build(String),

    #[error("Sound file not found: {0}")]
    MissingSoundFile(String),

    #[error("Sound playback is not supported on {0}")]
    UnsupportedPlatform(&'static str),

    #[error("Sound playback failed: {0}")]
    Playback(String),
}

impl NotifyError {
    /// Expected no-ops that should be logged as warnings rather than errors.
    pub fn is_warning(&self) -> bool {
        matches!(self, NotifyError::UnsupportedPlatform(_))
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed settings file {path}: {source}")]
    Settings {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_lists_fields() {
        let err = NotifyError::MissingCredentials(vec!["sender_email", "receiver_email"]);
        assert_eq!(
            err.to_string(),
            "Email credentials are not configured (missing: sender_email, receiver_email)"
        );
    }

    #[test]
    fn test_only_unsupported_platform_is_warning() {
        assert!(NotifyError::UnsupportedPlatform("linux").is_warning());
        assert!(!NotifyError::MissingSoundFile("/tmp/x.aiff".into()).is_warning());
        assert!(!NotifyError::Playback("exit status 1".into()).is_warning());
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(FetchError::Http { status: 500 }.to_string(), "HTTP error: status 500");
        assert_eq!(
            FetchError::AssetNotFound("pepe".into()).to_string(),
            "Asset 'pepe' not found in provider response"
        );
    }
}
