//! Error types for the PowerPlanner scraper.
//!
//! Each stage of the login-and-fetch sequence fails with its own error kind so
//! callers (and the CLI exit code) can tell a changed portal layout apart from
//! a rejected login or a broken network.

use thiserror::Error;

/// Result type alias using our custom error types.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type that encompasses all application errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Portal communication, login and translation errors
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// Generic errors that don't fit other categories
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Process exit code reported by the CLI for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Other(_) => 1,
            Self::Scrape(err) => err.exit_code(),
        }
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable parsing failed
    #[error("failed to parse environment variables: {0}")]
    EnvParse(String),

    /// Configuration value is invalid
    #[error("invalid configuration value for {field}: {message}")]
    Invalid { field: String, message: String },
}

/// Errors raised while logging in to the portal and fetching usage data.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The landing page no longer has the shape the login handshake expects
    #[error("portal structure changed: {0}")]
    PortalStructure(#[from] PortalStructureError),

    /// The key material could not be used to encrypt the credentials
    #[error("credential encryption failed: {0}")]
    Encryption(#[from] EncryptionError),

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The portal did not accept the credentials
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The data endpoint returned an error status
    #[error("server error (status {status}): {message}")]
    ServerError { status: u16, message: String },

    /// The data endpoint answered with something that is not JSON
    #[error("response is not valid JSON ({source}): {snippet}")]
    DataParse {
        snippet: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Missing pieces of the landing page or its cookies.
#[derive(Error, Debug)]
pub enum PortalStructureError {
    /// A cookie the handshake needs was not set
    #[error("cookie '{name}' not found")]
    MissingCookie { name: String },

    /// Element not found in HTML
    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    /// Element exists but lacks the attribute, or the attribute is empty
    #[error("element '{selector}' has no '{attribute}' value")]
    MissingAttribute { selector: String, attribute: String },

    /// Invalid CSS selector
    #[error("invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Failures of the legacy RSA credential encryption.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncryptionError {
    #[error("invalid RSA modulus '{0}'")]
    InvalidModulus(String),

    #[error("invalid RSA exponent '{0}'")]
    InvalidExponent(String),

    #[error("message of {len} bytes is too long for a {max}-byte RSA block")]
    MessageTooLong { len: usize, max: usize },
}

impl ConfigError {
    /// Creates a new environment parse error.
    pub fn env_parse(err: impl std::fmt::Display) -> Self {
        Self::EnvParse(err.to_string())
    }

    /// Creates a new invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.to_string(),
        }
    }
}

impl ScrapeError {
    /// Creates a server error from HTTP status and response body.
    pub fn server_error(status: reqwest::StatusCode, body: String) -> Self {
        Self::ServerError {
            status: status.as_u16(),
            message: body,
        }
    }

    /// Creates a data parse error, keeping the head of the offending body.
    pub fn data_parse(body: &str, source: serde_json::Error) -> Self {
        Self::DataParse {
            snippet: body.chars().take(120).collect(),
            source,
        }
    }

    /// Process exit code reported by the CLI for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::PortalStructure(_) => 2,
            Self::Encryption(_) => 3,
            Self::Network(_) => 4,
            Self::Authentication(_) => 5,
            Self::DataParse { .. } => 6,
            Self::ServerError { .. } => 7,
        }
    }
}

impl PortalStructureError {
    /// Creates a missing cookie error.
    pub fn missing_cookie(name: impl Into<String>) -> Self {
        Self::MissingCookie { name: name.into() }
    }

    /// Creates an element not found error.
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// Creates a missing attribute error.
    pub fn missing_attribute(selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            selector: selector.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid selector error.
    pub fn invalid_selector(selector: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: err.to_string(),
        }
    }
}
