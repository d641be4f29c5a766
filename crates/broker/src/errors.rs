//! Error types for broker operations.
//!
//! [`BrokerError`] is returned by every [`crate::BrokerClient`] operation
//! except [`crate::BrokerClient::exists`], which folds all failures into
//! `false`. Nothing here is retried; every error surfaces to the caller.

use std::fmt;

use model::Page;
use thiserror::Error;

/// Result type for broker operations.
pub type BrokerResult<T> = Result<T, BrokerError>;

/// The embedded status code the broker uses for success.
pub const STATUS_OK: u32 = 200;

/// Failure to obtain a usable response body from the broker.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("connection failed: {0}")]
    Connection(String),

    /// The body arrived but is not JSON at all, or is cut short.
    #[error("response body is not JSON: {0}")]
    Body(#[source] serde_json::Error),
}

/// Errors produced by broker client operations.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Network or connection failure, propagated unchanged.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body is JSON but does not match the expected envelope
    /// shape. Bodies that are not JSON are [`TransportError::Body`].
    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The broker's embedded status was present but not 200.
    ///
    /// The attempted change is considered not to have happened; the local
    /// entity is left as the caller set it.
    #[error("broker operation failed: code={code} message={message}")]
    OperationFailed {
        /// Embedded status code.
        code: u32,
        /// Embedded reason phrase.
        message: String,
    },

    /// A well-formed success envelope carried no result elements.
    #[error("unexpected result: {0}")]
    UnexpectedResult(String),

    /// Client configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BrokerError {
    /// Returns the broker's embedded status code for [`BrokerError::OperationFailed`].
    pub fn status_code(&self) -> Option<u32> {
        match self {
            BrokerError::OperationFailed { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// A listing that stopped on an error after some pages had been collected.
///
/// The entities gathered before the failing page are kept rather than
/// discarded.
pub struct PartialListing<E> {
    /// Entities collected from every page before `page`.
    pub entities: Vec<E>,
    /// The page whose fetch failed.
    pub page: Page,
    /// The failure.
    pub source: BrokerError,
}

impl<E> PartialListing<E> {
    /// Splits into the partial result and the error.
    pub fn into_parts(self) -> (Vec<E>, BrokerError) {
        (self.entities, self.source)
    }
}

impl<E> fmt::Debug for PartialListing<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialListing")
            .field("entities", &self.entities.len())
            .field("page", &self.page)
            .field("source", &self.source)
            .finish()
    }
}

impl<E> fmt::Display for PartialListing<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "listing stopped at page {} after {} entities: {}",
            self.page,
            self.entities.len(),
            self.source
        )
    }
}

impl<E> std::error::Error for PartialListing<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
