//! Error types for BrandPitch.
//!
//! Library crates use [`BrandPitchError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all BrandPitch operations.
#[derive(Debug, thiserror::Error)]
pub enum BrandPitchError {
    /// Local configuration is missing or invalid (credential env var unset,
    /// unreadable config file, malformed catalog).
    #[error("config error: {message}")]
    Config { message: String },

    /// The brand provider has no record for the domain.
    #[error("no brand data found for '{domain}'")]
    NotFound { domain: String },

    /// The brand provider rejected our credential.
    #[error("brand provider rejected credentials: {0}")]
    Auth(String),

    /// Any other brand provider failure (timeout, 5xx, malformed payload).
    #[error("brand provider error: {0}")]
    Upstream(String),

    /// Industry classification call failed or returned an unusable payload.
    #[error("classification error: {0}")]
    Classification(String),

    /// Content generation call failed or returned unparsable JSON.
    #[error("generation error: {0}")]
    Generation(String),

    /// Input contract violation or a model payload with the wrong shape.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BrandPitchError>;

impl BrandPitchError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a not-found error for a normalized domain.
    pub fn not_found(domain: impl Into<String>) -> Self {
        Self::NotFound {
            domain: domain.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether retrying (or falling back to manual entry) can succeed
    /// without changing configuration.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NotFound { .. }
            | Self::Upstream(_)
            | Self::Classification(_)
            | Self::Generation(_)
            | Self::Validation { .. } => true,
            Self::Config { .. } | Self::Auth(_) | Self::Io { .. } => false,
        }
    }

    /// Whether the caller should offer to continue with user-supplied brand
    /// facts instead of a provider lookup or model classification.
    pub fn offers_manual_entry(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Upstream(_) | Self::Classification(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = BrandPitchError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = BrandPitchError::not_found("uniqlo.com");
        assert_eq!(err.to_string(), "no brand data found for 'uniqlo.com'");

        let err = BrandPitchError::validation("brand description is empty");
        assert!(err.to_string().contains("description is empty"));
    }

    #[test]
    fn recoverability_follows_taxonomy() {
        assert!(BrandPitchError::not_found("x.com").is_recoverable());
        assert!(BrandPitchError::Upstream("timeout".into()).is_recoverable());
        assert!(BrandPitchError::Generation("bad json".into()).is_recoverable());
        assert!(!BrandPitchError::Auth("401".into()).is_recoverable());
        assert!(!BrandPitchError::config("no key").is_recoverable());
    }

    #[test]
    fn manual_entry_offered_for_lookup_and_classification_failures() {
        assert!(BrandPitchError::not_found("x.com").offers_manual_entry());
        assert!(BrandPitchError::Classification("garbled".into()).offers_manual_entry());
        assert!(!BrandPitchError::Auth("401".into()).offers_manual_entry());
        assert!(!BrandPitchError::validation("empty").offers_manual_entry());
    }
}
