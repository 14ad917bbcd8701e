// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Device API errors and the application error with conversions from common Rust and 3rd-party
//! errors.

use actix::MailboxError;
use derive_more::Display;

/// Error returned by the OverSight device client.
///
/// Only [`ApiError::Communication`] is the result of transport instability: the client already
/// retried the request before returning it. Everything else is returned on the first failure.
#[derive(Debug, Clone, Display, PartialEq)]
pub enum ApiError {
    /// Timeout, connection, name resolution or payload read failure after all retries.
    #[display("Error communicating with OverSight device at {address} - {cause}")]
    Communication { address: String, cause: String },

    /// HTTP error status, device reported error or unexpected failure.
    #[display("{message}")]
    Api {
        message: String,
        /// Underlying cause for diagnostics.
        cause: Option<String>,
    },
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn api(message: impl Into<String>) -> Self {
        ApiError::Api {
            message: message.into(),
            cause: None,
        }
    }

    /// Wrap an unexpected failure during a device exchange.
    pub fn unexpected(e: impl std::fmt::Debug + std::fmt::Display) -> Self {
        ApiError::Api {
            message: format!("Unexpected error communicating with OverSight device - {e}"),
            cause: Some(format!("{e:?}")),
        }
    }
}

#[derive(Debug, Display, PartialEq)]
pub enum ServiceError {
    #[display("Internal server error: {_0}")]
    InternalServerError(String),

    #[display("BadRequest: {_0}")]
    BadRequest(String),

    #[display("Not found: {_0}")]
    NotFound(String),

    /// A device with the same unique identifier is already set up.
    #[display("Device already configured: {_0}")]
    AlreadyConfigured(String),

    /// The device could not be reached or returned an error during setup.
    #[display("Device setup failed: {_0}")]
    SetupFailed(ApiError),

    #[display("{_0}")]
    Api(ApiError),
}

impl std::error::Error for ServiceError {}

impl From<ApiError> for ServiceError {
    fn from(e: ApiError) -> Self {
        ServiceError::Api(e)
    }
}

impl From<MailboxError> for ServiceError {
    fn from(e: MailboxError) -> Self {
        ServiceError::InternalServerError(format!("Internal message error: {e:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn communication_error_message_contains_address_and_cause() {
        let e = ApiError::Communication {
            address: "10.0.0.5:5001".into(),
            cause: "connection refused".into(),
        };
        assert_eq!(
            "Error communicating with OverSight device at 10.0.0.5:5001 - connection refused",
            e.to_string()
        );
    }

    #[test]
    fn api_error_displays_device_message_only() {
        let e = ApiError::api("Invalid parameter");
        assert_eq!("Invalid parameter", e.to_string());
    }

    #[test]
    fn mailbox_error_is_an_internal_error() {
        let e = ServiceError::from(MailboxError::Closed);
        assert!(matches!(e, ServiceError::InternalServerError(_)), "{e:?}");
    }

    #[test]
    fn unexpected_error_keeps_cause() {
        let e = ApiError::unexpected("boom");
        match e {
            ApiError::Api { message, cause } => {
                assert!(message.ends_with("- boom"), "Unexpected message: {message}");
                assert_eq!(Some("\"boom\"".to_string()), cause);
            }
            _ => panic!("Expected Api error"),
        }
    }

    #[test]
    fn service_error_from_api_error() {
        let e: ServiceError = ApiError::api("nope").into();
        assert_eq!(ServiceError::Api(ApiError::api("nope")), e);
    }
}
