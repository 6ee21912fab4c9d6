//! Error types for the client.
//!
//! Two layers: [`FilterError`] covers everything that can go wrong while
//! constructing search filters (always at construction time, never later),
//! and [`Error`] covers the crate as a whole, including transport and API
//! failures. Internal detail (response bodies, transport errors) is logged
//! via `tracing`; the messages carried on the variants stay terse enough to
//! show to an end user.

use thiserror::Error;

/// Failure while constructing a search filter.
///
/// These are raised by [`Filter`](crate::search::Filter) constructors and the
/// fluent [`FilterBuilder`](crate::search::FilterBuilder) methods. A filter
/// that failed construction is never appended to a builder, so none of these
/// can surface after `build()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The operator string is not a member of the filter category's fixed set.
    #[error("invalid {category} operator {operator:?}, allowed: {allowed:?}")]
    InvalidOperator {
        /// Filter category the operator was checked against (e.g. "date").
        category: &'static str,
        /// The rejected operator string.
        operator: String,
        /// The full allowed set for the category.
        allowed: &'static [&'static str],
    },

    /// The value shape is incompatible with the chosen operator, e.g. a
    /// scalar where `BETWEEN` needs a two-element sequence.
    #[error("operator {operator:?} expects {expected}")]
    ValueShape {
        operator: String,
        /// Human description of the expected shape.
        expected: &'static str,
    },

    /// Both a singular `locale` and a plural `locales` qualifier were
    /// supplied where only one is valid.
    #[error("filter on {target:?} sets both `locale` and `locales`; supply only one")]
    AmbiguousLocale { target: String },
}

/// Crate-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Search filter construction failed.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The client was configured with invalid parameters (bad base URL).
    #[error("invalid client configuration: {message}")]
    Config { message: String },

    /// The HTTP request itself failed (connection, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Authentication against the token endpoint failed.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The API answered with a non-success status code.
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// A response body could not be decoded into the expected shape.
    #[error("could not decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response was syntactically valid JSON but missing the structure
    /// the endpoint documents (e.g. no `_embedded.items` on a list).
    #[error("unexpected response shape: {message}")]
    UnexpectedResponse { message: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
