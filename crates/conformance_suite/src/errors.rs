use std::io;

use booker_client::StatusCode;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Why a single conformance step did not pass.
///
/// Transport problems are kept apart from contract violations so a flaky
/// network shows up as an infrastructure error, not as a broken API.
#[derive(Error, Debug)]
pub enum StepFailure {
    /// No response was received (connection refused, DNS, timeout).
    #[error("Infrastructure error: {0}")]
    Transport(#[source] booker_client::Error),

    /// The service answered with a different status code.
    #[error("Expected status {expected} but got {actual}; body: {body}")]
    UnexpectedStatus {
        expected: StatusCode,
        actual: StatusCode,
        body: String,
    },

    /// A mutating call was rejected because the token was not accepted.
    #[error("Authorization failed with status {status}; token rejected")]
    Unauthorized { status: StatusCode },

    /// A JSON value differs from the expected one.
    #[error("Assertion failed at '{path}': expected {expected}, got {actual}")]
    Assertion {
        path: String,
        expected: String,
        actual: String,
    },

    /// A JSON value that must be present is absent or null.
    #[error("Missing field at '{path}'")]
    MissingField { path: String },

    /// The body could not be decoded into the expected shape.
    #[error("Failed to decode response body: {message}")]
    Decode { message: String },

    /// The response took longer than the allowed ceiling.
    #[error("Response took {actual_ms} ms; ceiling is {ceiling_ms} ms")]
    LatencyExceeded { ceiling_ms: u64, actual_ms: u64 },

    /// An earlier step left the context in a state this step cannot use.
    #[error("Precondition not met: {0}")]
    Precondition(String),
}

impl StepFailure {
    /// Whether this failure is an infrastructure problem rather than a
    /// contract violation.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, StepFailure::Transport(e) if e.is_transport())
    }
}

impl From<booker_client::Error> for StepFailure {
    fn from(error: booker_client::Error) -> Self {
        match error {
            booker_client::Error::Decode { message, .. } => StepFailure::Decode { message },
            other => StepFailure::Transport(other),
        }
    }
}

/// Errors loading or validating suite configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Read(#[source] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that stop the whole suite.
#[derive(Error, Debug)]
pub enum SuiteError {
    /// Setup could not obtain a token; no mutating step can run.
    #[error("Suite setup failed: {0}")]
    Setup(#[source] StepFailure),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The booking client could not be constructed.
    #[error("Failed to create booking client: {0}")]
    Client(#[source] booker_client::Error),

    #[error("Failed to write report: {0}")]
    Report(#[source] io::Error),
}
