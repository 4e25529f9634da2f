//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
include!(concat!(env!("OUT_DIR"), "/ua.rs"));

pub(crate) fn client_version() -> &'static str {
    CLIENT_VERSION
}

pub(crate) fn user_agent() -> &'static str {
    USER_AGENT
}

/// The error type returned by all operations in this library.
#[derive(Debug, Clone)]
pub struct DynamoError {
    pub code: DynamoErrorCode,
    pub message: String,
}

impl std::error::Error for DynamoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::fmt::Display for DynamoError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "code={:?} message=\"{}\"", self.code, self.message)
    }
}

impl DynamoError {
    pub fn new(code: DynamoErrorCode, msg: &str) -> DynamoError {
        DynamoError {
            code,
            message: msg.to_string(),
        }
    }

    /// Create a [`DynamoErrorCode::GeneralError`] from the best reason the service gave, if any.
    pub fn general(reason: Option<&str>) -> DynamoError {
        DynamoError {
            code: DynamoErrorCode::GeneralError,
            message: reason.unwrap_or("no failure reason available").to_string(),
        }
    }

    /// Returns true if the error represents a transient throttling condition
    /// that the request executor retries internally.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

macro_rules! ia_error {
    ($($t:tt)*) => {{
        let m = format!($($t)*);
        DynamoError {
            code: crate::error::DynamoErrorCode::IllegalArgument,
            message: format!("{} ({})", m, crate::error::client_version()),
        }
    }};
}

pub(crate) use ia_error;

macro_rules! ia_err {
    ($($t:tt)*) => {{
        let m = format!($($t)*);
        Err(DynamoError {
            code: crate::error::DynamoErrorCode::IllegalArgument,
            message: format!("{} ({})", m, crate::error::client_version()),
        })
    }};
}

pub(crate) use ia_err;

impl From<reqwest::Error> for DynamoError {
    fn from(e: reqwest::Error) -> Self {
        let code = if e.is_timeout() {
            DynamoErrorCode::RequestTimeout
        } else {
            DynamoErrorCode::TransportError
        };
        DynamoError {
            code,
            message: format!("reqwest error: {} ({})", e, client_version()),
        }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for DynamoError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        ia_error!("invalid header value: {}", e)
    }
}

impl From<url::ParseError> for DynamoError {
    fn from(e: url::ParseError) -> Self {
        ia_error!("error parsing url: {}", e)
    }
}

impl From<serde_json::Error> for DynamoError {
    fn from(e: serde_json::Error) -> Self {
        DynamoError {
            code: DynamoErrorCode::BadProtocolMessage,
            message: format!("invalid json: {}", e),
        }
    }
}

/// Category of a [`DynamoError`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DynamoErrorCode {
    /// The application supplied an illegal argument or configuration value.
    IllegalArgument,

    /// The service reported that the provisioned throughput of the table
    /// was exceeded.
    ///
    /// Requests failing with this error are retried internally with
    /// exponential backoff. It is only returned to the application when the
    /// backoff ceiling has been reached.
    ProvisionedThroughputExceeded,

    /// The service throttled the request because the request rate is too high.
    ///
    /// Like [`ProvisionedThroughputExceeded`](DynamoErrorCode::ProvisionedThroughputExceeded),
    /// this is retried internally and only surfaces once the backoff ceiling is reached.
    Throttling,

    /// Any other non-success response from the service. The message holds the
    /// service's reason if one was available.
    GeneralError,

    /// The transport timed out before a response was received.
    RequestTimeout,

    /// The request could not be delivered (connection refused, reset, dns, ...).
    /// Transport errors are never retried.
    TransportError,

    /// The request could not be signed with the configured credentials.
    SigningError,

    /// A returned item decoded cleanly but did not fit the requested native shape.
    Deserialization,

    /// The requested item does not exist.
    ItemNotFound,

    /// The service returned a body that could not be understood.
    BadProtocolMessage,
}

impl DynamoErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DynamoErrorCode::ProvisionedThroughputExceeded | DynamoErrorCode::Throttling
        )
    }
}
