//! Error types for the RUZ API client.

use thiserror::Error;

use crate::params::ParamType;

/// Errors surfaced by the RUZ API client.
///
/// Construction problems and validation failures always propagate to the
/// caller before any network I/O. Transport failures never appear here:
/// the dispatcher collapses them into an empty result (see
/// [`RuzClient::get`](crate::RuzClient::get)).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuzError {
    /// Malformed client configuration (base URL, catalog, schema or
    /// domain set). Raised at construction time.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The endpoint has no entry in the schema or URL catalog.
    #[error("unknown endpoint: '{0}'")]
    UnknownEndpoint(String),

    /// A supplied parameter is not declared for the endpoint.
    #[error("unknown parameter '{param}' for endpoint '{endpoint}'")]
    UnknownParameter {
        /// Endpoint the request was addressed to.
        endpoint: String,
        /// Offending parameter name.
        param: String,
    },

    /// A parameter value does not match the schema-declared type.
    #[error("expected {expected} for '{endpoint}'::'{param}', got {got}")]
    TypeMismatch {
        /// Endpoint the request was addressed to.
        endpoint: String,
        /// Offending parameter name.
        param: String,
        /// Type declared by the schema.
        expected: ParamType,
        /// Type of the supplied value.
        got: ParamType,
    },

    /// A schedule request carries none of the four subject identifiers
    /// (`lecturerOid`, `auditoriumOid`, `studentOid`, `email`).
    #[error(
        "one of the following is required for the schedule endpoint: \
         lecturerOid, auditoriumOid, studentOid, email"
    )]
    MissingIdentifier,

    /// The email domain is neither the student nor the staff domain.
    #[error("unrecognized email domain: '{0}'")]
    UnknownDomain(String),

    /// The email does not match the institutional address pattern.
    #[error("malformed email address: '{0}'")]
    MalformedEmail(String),
}

/// Failure of a single HTTP attempt. Never crosses the public surface.
#[derive(Debug, Error)]
pub(crate) enum TransportError {
    /// Connection failure or HTTP error status.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body is not valid JSON.
    #[error("JSON decoding failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Outcome of the full dispatch protocol (v2 attempt plus v1 fallback).
#[derive(Debug, Error)]
pub(crate) enum DispatchError {
    /// Route resolution failed; propagated to the caller as-is.
    #[error(transparent)]
    Validation(RuzError),

    /// Both attempts failed; collapsed into an empty result by `get`.
    #[error(transparent)]
    Transport(TransportError),
}
