//! Error types for fetch and cache operations.
//!
//! This module defines [`FetchError`] which covers every failure a stock data
//! request can end in, and [`ErrorKind`], its field-less classification. Each
//! error knows whether it is retryable (transient) and whether it should be
//! memoized as a permanent failure.

use thiserror::Error;

/// Errors that can occur while fetching or caching stock data.
///
/// The type is `Clone` so one outcome can be handed to every caller that
/// joined the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Missing or empty credential/base URL. Fatal for the attempted operation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Response shape mismatch or an API error envelope in the body.
    #[error("Validation error: {0}")]
    Validation(String),

    /// HTTP 401: the API credential was rejected.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Status text or API message.
        message: String,
    },

    /// HTTP 402: the request needs a higher plan or the quota is exhausted.
    #[error("Payment required: {message}")]
    PaymentRequired {
        /// Status text or API message.
        message: String,
    },

    /// HTTP 403: the credential lacks permission for this endpoint.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Status text or API message.
        message: String,
    },

    /// HTTP 404: the symbol or endpoint is unknown.
    #[error("Not found: {message}")]
    NotFound {
        /// Status text or API message.
        message: String,
    },

    /// HTTP 5xx: the provider failed; assumed transient.
    #[error("Server error {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Status text or API message.
        message: String,
    },

    /// Any other HTTP 4xx.
    #[error("Client error {status}: {message}")]
    Client {
        /// HTTP status code.
        status: u16,
        /// Status text or API message.
        message: String,
    },

    /// A non-success status outside the 4xx/5xx ranges.
    #[error("Unexpected HTTP status {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Status text or API message.
        message: String,
    },

    /// The request never produced a response (connection, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// A previously memoized permanent failure being replayed.
    #[error("{message}")]
    CachedFailure {
        /// Status of the original failure, when it was recorded.
        status: Option<u16>,
        /// The message recorded with the original failure.
        message: String,
    },

    /// The persistent key-value backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Field-less classification of a [`FetchError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`FetchError::Configuration`].
    Configuration,
    /// See [`FetchError::Validation`].
    Validation,
    /// See [`FetchError::Unauthorized`].
    Unauthorized,
    /// See [`FetchError::PaymentRequired`].
    PaymentRequired,
    /// See [`FetchError::Forbidden`].
    Forbidden,
    /// See [`FetchError::NotFound`].
    NotFound,
    /// See [`FetchError::Server`].
    Server,
    /// See [`FetchError::Client`].
    Client,
    /// See [`FetchError::Http`].
    Http,
    /// See [`FetchError::Network`].
    Network,
    /// See [`FetchError::CachedFailure`].
    CachedFailure,
    /// See [`FetchError::Storage`].
    Storage,
}

impl ErrorKind {
    /// Stable error name, e.g. `PaymentRequiredError`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Configuration => "ConfigurationError",
            Self::Validation => "ValidationError",
            Self::Unauthorized => "UnauthorizedError",
            Self::PaymentRequired => "PaymentRequiredError",
            Self::Forbidden => "ForbiddenError",
            Self::NotFound => "NotFoundError",
            Self::Server => "ServerError",
            Self::Client => "ClientError",
            Self::Http => "HttpError",
            Self::Network => "NetworkError",
            Self::CachedFailure => "CachedFailureError",
            Self::Storage => "StorageError",
        }
    }
}

impl FetchError {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::PaymentRequired { .. } => ErrorKind::PaymentRequired,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Server { .. } => ErrorKind::Server,
            Self::Client { .. } => ErrorKind::Client,
            Self::Http { .. } => ErrorKind::Http,
            Self::Network(_) => ErrorKind::Network,
            Self::CachedFailure { .. } => ErrorKind::CachedFailure,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Stable error name, e.g. `PaymentRequiredError`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// HTTP status associated with this error, if any.
    ///
    /// A replayed failure reports the status it was recorded with.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::PaymentRequired { .. } => Some(402),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Server { status, .. } | Self::Client { status, .. } | Self::Http { status, .. } => {
                Some(*status)
            }
            Self::CachedFailure { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns true if retrying the identical request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Server { .. } | Self::Network(_))
    }

    /// Returns true if this failure must be recorded so identical requests
    /// are short-circuited (401/402/403/404).
    #[must_use]
    pub const fn is_memoizable(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. }
                | Self::PaymentRequired { .. }
                | Self::Forbidden { .. }
                | Self::NotFound { .. }
        )
    }

    /// Returns true for a fresh or replayed "plan/quota required" failure.
    #[must_use]
    pub const fn is_payment_required(&self) -> bool {
        matches!(self.status(), Some(402))
    }

    /// Human-readable message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(_) => "The data service is not configured.".to_string(),
            Self::Validation(_) => "The data service returned an unexpected response.".to_string(),
            Self::Unauthorized { .. } => "The API key was rejected.".to_string(),
            Self::PaymentRequired { .. } => {
                "This data is not available on the current API plan.".to_string()
            }
            Self::Forbidden { .. } => "Access to this data is not permitted.".to_string(),
            Self::NotFound { .. } => "No data was found for this symbol.".to_string(),
            Self::Server { .. } => "The data service is temporarily unavailable.".to_string(),
            Self::Client { .. } => "The request was rejected by the data service.".to_string(),
            Self::Http { status, .. } => format!("Unexpected response from the data service ({status})."),
            Self::Network(_) => "Could not reach the data service.".to_string(),
            Self::CachedFailure { message, .. } => message.clone(),
            Self::Storage(_) => "Local storage is unavailable.".to_string(),
        }
    }

    /// Actionable suggestion for the user, when one applies.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Configuration(_) | Self::Unauthorized { .. } => {
                Some("Check the API credential and base URL settings.")
            }
            Self::PaymentRequired { .. } => Some("Upgrade the API plan or wait for the quota to reset."),
            Self::Forbidden { .. } => Some("Check the permissions of the API plan."),
            Self::NotFound { .. } => Some("Try a different symbol."),
            Self::Server { .. } | Self::Network(_) => Some("Wait a moment and retry."),
            Self::Client { .. } | Self::Validation(_) => Some("Try a different search."),
            Self::CachedFailure { .. } => Some("This request failed earlier; try a different symbol."),
            Self::Http { .. } | Self::Storage(_) => None,
        }
    }
}

/// Result type alias using [`FetchError`].
pub type Result<T> = std::result::Result<T, FetchError>;
