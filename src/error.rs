// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `SlideDrive` library.
//!
//! Failures fall into three groups with distinct handling policies:
//! transient transport failures are retried by the client and surfaced as
//! [`ProtocolError`] only once retries are exhausted; logical failures
//! (non-2xx status, malformed body) are logged and reported as an absent
//! result rather than an error; an authentication probe failure is surfaced
//! at setup time so configuration fails closed.

use std::time::Duration;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors related to HTTP communication with the actuator.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP transport failed on every attempt.
    #[error("HTTP request failed after {attempts} attempts: {source}")]
    Http {
        /// Number of attempts performed, including the first.
        attempts: u32,
        /// The error from the last attempt.
        #[source]
        source: reqwest::Error,
    },

    /// Every attempt timed out.
    #[error("request timed out after {attempts} attempts ({timeout:?} per attempt)")]
    Timeout {
        /// Number of attempts performed, including the first.
        attempts: u32,
        /// The per-attempt timeout.
        timeout: Duration,
    },

    /// Failed to construct the HTTP client.
    #[error("failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The authentication probe failed.
    #[error("authentication failed")]
    AuthenticationFailed,
}

impl ProtocolError {
    /// Returns `true` if this error is transient (a retry might succeed).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Timeout { .. })
    }
}

/// Errors related to parsing actuator responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing or decoding failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The exchange produced no payload to parse.
    #[error("no payload in response")]
    NoPayload,
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display_includes_attempts() {
        let err = ProtocolError::Timeout {
            attempts: 3,
            timeout: Duration::from_secs(10),
        };
        assert_eq!(
            err.to_string(),
            "request timed out after 3 attempts (10s per attempt)"
        );
    }

    #[test]
    fn transient_classification() {
        assert!(
            ProtocolError::Timeout {
                attempts: 1,
                timeout: Duration::from_secs(1),
            }
            .is_transient()
        );
        assert!(!ProtocolError::AuthenticationFailed.is_transient());
        assert!(!ProtocolError::InvalidAddress("no host".to_string()).is_transient());
    }

    #[test]
    fn error_from_parse_error() {
        let parse_err = ParseError::NoPayload;
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Parse(ParseError::NoPayload)));
    }

    #[test]
    fn parse_error_display() {
        assert_eq!(ParseError::NoPayload.to_string(), "no payload in response");
    }
}
