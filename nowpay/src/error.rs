//! Error types for payment operations.

use crate::dispatch::DispatchError;

/// Errors returned by [`PaymentClient`](crate::PaymentClient) operations and
/// [`decode_payment`](crate::decode_payment).
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Required request data is missing.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The request could not be serialized to JSON.
    #[error("encoding error: {context}: {source}")]
    Encoding {
        /// Human-readable context.
        context: &'static str,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The dispatcher failed. The error is passed through untouched.
    #[error(transparent)]
    Dispatch(DispatchError),

    /// The response could not be decoded into the expected shape.
    #[error("decoding error: {context}: {source}")]
    Decoding {
        /// Human-readable context.
        context: &'static str,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

impl PaymentError {
    /// Wraps an error surfaced by a [`Dispatcher`](crate::Dispatcher).
    #[must_use]
    pub fn dispatch(err: DispatchError) -> Self {
        Self::Dispatch(err)
    }

    /// Returns `true` for [`PaymentError::InvalidArgument`].
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns `true` for [`PaymentError::Decoding`].
    #[must_use]
    pub const fn is_decoding(&self) -> bool {
        matches!(self, Self::Decoding { .. })
    }
}
