//! Error types for every stage of the batch-payment pipeline.
//!
//! Each component owns its error enum; [`Error`] folds them together for the
//! CLI, which reports the message and exits with code 1.

use thiserror::Error;

use crate::payment::RiseId;

/// Failures while reading the payments file.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unable to read payments file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported token: {0}")]
    UnsupportedToken(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("RiseId not found in {0}")]
    RiseIdNotFound(String),

    #[error("Multiple RiseIds found in {0}")]
    MultipleRiseIds(String),

    #[error("Payments file contains no payments")]
    Empty,

    #[error("Total amount of the payments file exceeds the largest representable amount")]
    TotalOverflow,
}

/// Failures talking to the local signing agent.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("Invalid signer URL {0}")]
    InvalidUrl(String),

    #[error("Signer request {method} failed: {source}")]
    Rpc {
        method: &'static str,
        #[source]
        source: alloy::transports::TransportError,
    },

    #[error("Signer request {method} timed out after {secs} seconds")]
    Timeout { method: &'static str, secs: u64 },

    #[error("Expected account to be unlocked")]
    NoAccount,
}

/// Failures talking to the payments API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response; the message carries the server's `message` field when present.
    #[error("{0}")]
    Status(String),

    #[error("Unable to {method} {url}: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unable to decode response: {0}")]
    Decode(String),

    #[error("Unable to find `data` field in response: {0}")]
    MissingData(String),

    #[error("Payee with rise id {0} not found")]
    PayeeNotFound(RiseId),

    #[error("Batch total exceeds the largest representable amount")]
    AmountOverflow,

    #[error("Signing failed: {0}")]
    Signer(#[from] SignerError),
}

/// Invalid or missing environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required variable={0} not found")]
    Missing(&'static str),

    #[error("Variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Orchestration outcomes that stop the run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Recipient {0} is not a payee")]
    NotAPayee(RiseId),

    #[error("Payment cancelled by user")]
    Cancelled,

    #[error("Script aborted")]
    Aborted,

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error returned by [`crate::run`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Run(#[from] RunError),
}
