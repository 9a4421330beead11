//! Error types for session, job, and execution operations.

use std::io;

use reqwest::StatusCode;
use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, RundeckError>;

/// Primary error type for client operations.
#[derive(Debug, Error)]
pub enum RundeckError {
    /// A required argument was missing or empty.
    #[error("{message}")]
    Validation {
        /// User-facing description of the missing input.
        message: &'static str,
    },
    /// No job carries the requested label.
    #[error("job '{label}' not found")]
    JobNotFound {
        /// Label the caller asked for.
        label: String,
    },
    /// Top-level command was not recognised.
    #[error("command '{command}' not found")]
    UnknownCommand {
        /// Verb entered by the user.
        command: String,
    },
    /// `help` sub-command was not recognised.
    #[error("sub command '{command}' not found")]
    UnknownSubCommand {
        /// Sub-verb entered by the user.
        command: String,
    },
    /// Scheme and host did not form a valid base URL.
    #[error("invalid base URL '{url}'")]
    InvalidBaseUrl {
        /// URL that failed to parse.
        url: String,
        /// Parser failure detail.
        #[source]
        source: url::ParseError,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    ClientBuild {
        /// Builder failure detail.
        #[source]
        source: reqwest::Error,
    },
    /// Transport-level failure talking to the server.
    #[error("request to {path} failed")]
    Network {
        /// API path that was requested.
        path: String,
        /// Transport failure detail.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("request to {path} returned status {status}")]
    UnexpectedStatus {
        /// API path that was requested.
        path: String,
        /// Status code returned by the server.
        status: StatusCode,
    },
    /// A JSON response body could not be decoded.
    #[error("failed to decode response from {path}")]
    DecodeJson {
        /// API path that was requested.
        path: String,
        /// Decoder failure detail.
        #[source]
        source: serde_json::Error,
    },
    /// A YAML response body could not be decoded.
    #[error("failed to decode response from {path}")]
    DecodeYaml {
        /// API path that was requested.
        path: String,
        /// Decoder failure detail.
        #[source]
        source: serde_yaml::Error,
    },
    /// The definition document was an empty list.
    #[error("job definition for '{label}' not found")]
    EmptyDefinition {
        /// Label of the job whose definition was requested.
        label: String,
    },
    /// The server refused the supplied credentials.
    #[error("login as '{user}' was rejected ({reason})")]
    LoginRejected {
        /// Username used for the attempt.
        user: String,
        /// What the server response looked like.
        reason: String,
    },
    /// Writing to the output sink failed.
    #[error("failed to write output")]
    Output(#[from] io::Error),
}

/// Coarse classification of [`RundeckError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing required argument.
    Validation,
    /// Job or name not resolvable.
    Lookup,
    /// Unknown verb or sub-verb.
    Command,
    /// Transport failure or unexpected HTTP status.
    Network,
    /// Malformed JSON or YAML response.
    Decode,
    /// Login failure or unusable credentials.
    Auth,
    /// Output sink failure.
    Output,
}

impl RundeckError {
    /// Build a validation error with a fixed message.
    #[must_use]
    pub const fn validation(message: &'static str) -> Self {
        Self::Validation { message }
    }

    /// Classify the error into the coarse taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::JobNotFound { .. } => ErrorKind::Lookup,
            Self::UnknownCommand { .. } | Self::UnknownSubCommand { .. } => ErrorKind::Command,
            Self::InvalidBaseUrl { .. } | Self::ClientBuild { .. } | Self::LoginRejected { .. } => {
                ErrorKind::Auth
            }
            Self::Network { .. } | Self::UnexpectedStatus { .. } => ErrorKind::Network,
            Self::DecodeJson { .. } | Self::DecodeYaml { .. } | Self::EmptyDefinition { .. } => {
                ErrorKind::Decode
            }
            Self::Output(_) => ErrorKind::Output,
        }
    }
}
