use std::fmt;

/// Upstream service a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Mojang,
    Hypixel,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Mojang => f.write_str("Mojang API"),
            Service::Hypixel => f.write_str("Hypixel API"),
        }
    }
}

/// All errors that can occur while talking to the upstream APIs.
///
/// "Player not found" is not an error: lookups return `Ok(None)` for it.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Non-success HTTP status, `success: false` envelope, transport failure or timeout.
    #[error("{service} error: {message}")]
    Upstream { service: Service, message: String },

    /// The response body was not the JSON shape we expect.
    #[error("unexpected response from {service}: {context}")]
    Parse {
        service: Service,
        context: String,
    },
}

impl ApiError {
    pub(crate) fn upstream(service: Service, message: impl Into<String>) -> Self {
        ApiError::Upstream {
            service,
            message: message.into(),
        }
    }

    pub(crate) fn parse(service: Service, context: impl Into<String>) -> Self {
        ApiError::Parse {
            service,
            context: context.into(),
        }
    }

    /// Map a transport-level failure, folding timeouts into a fixed message.
    ///
    /// The URL is dropped from the message: request URLs carry the API key.
    pub(crate) fn transport(service: Service, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::upstream(service, "timed out")
        } else {
            Self::upstream(service, err.without_url().to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by command handlers; converted to replies at the dispatch boundary.
#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
