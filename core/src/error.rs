// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;

use http::StatusCode;
use thiserror::Error;

/// The error type for catenis operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,

    status: Option<StatusCode>,
    service_message: Option<String>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Credentials exist but are invalid/malformed
    CredentialInvalid,

    /// Request cannot be built or signed (invalid uri, header, etc.)
    RequestInvalid,

    /// Failure while talking to the transport (network, timeout, etc.)
    ClientRequest,

    /// The API endpoint answered with something that is not a success envelope
    UnexpectedResponse,

    /// The API endpoint answered with an error status
    ApiResponse,

    /// The notification channel is already open
    NotifyChannelAlreadyOpen,

    /// The notification channel could not be opened
    NotifyChannelOpen,

    /// The notification channel failed while it was open
    NotifyChannel,

    /// Unexpected errors
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            status: None,
            service_message: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Check if this is a local client error.
    ///
    /// Client errors are raised before or while talking to the transport, including
    /// responses that do not follow the expected envelope.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ClientRequest | ErrorKind::UnexpectedResponse
        )
    }

    /// Check if this error has been returned by the API endpoint.
    pub fn is_api_error(&self) -> bool {
        self.kind == ErrorKind::ApiResponse
    }

    /// Check if this is a notification channel error
    pub fn is_notify_channel_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::NotifyChannelAlreadyOpen
                | ErrorKind::NotifyChannelOpen
                | ErrorKind::NotifyChannel
        )
    }

    /// HTTP status code returned by the API endpoint.
    ///
    /// Only available for [`ErrorKind::ApiResponse`].
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status
    }

    /// HTTP reason phrase of the status returned by the API endpoint.
    pub fn reason_phrase(&self) -> Option<&'static str> {
        self.status.and_then(|v| v.canonical_reason())
    }

    /// Error message returned by the API endpoint, if any.
    pub fn service_message(&self) -> Option<&str> {
        self.service_message.as_deref()
    }
}

// Convenience constructors
impl Error {
    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a credential invalid error
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a client request error
    pub fn client_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClientRequest, message)
    }

    /// Create an unexpected response error carrying the raw body.
    pub fn unexpected_response(body: &str) -> Self {
        Self::new(
            ErrorKind::UnexpectedResponse,
            format!("Unexpected response returned by API endpoint: {body}"),
        )
    }

    /// Create an API response error.
    ///
    /// The message prefers the error message returned by the service and falls back
    /// to the HTTP reason phrase.
    pub fn api_response(status: StatusCode, service_message: Option<String>) -> Self {
        let detail = match (&service_message, status.canonical_reason()) {
            (Some(msg), _) => msg.as_str(),
            (None, Some(reason)) => reason,
            (None, None) => "",
        };

        let mut err = Self::new(
            ErrorKind::ApiResponse,
            format!(
                "Error returned from Catenis API endpoint: [{}] {detail}",
                status.as_u16()
            ),
        );
        err.status = Some(status);
        err.service_message = service_message;
        err
    }

    /// Create a notify channel already open error
    pub fn notify_channel_already_open() -> Self {
        Self::new(
            ErrorKind::NotifyChannelAlreadyOpen,
            "WebSocket notification channel is already open",
        )
    }

    /// Create a notify channel open error
    pub fn notify_channel_open(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotifyChannelOpen, message)
    }

    /// Create a notify channel error
    pub fn notify_channel(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotifyChannel, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::ClientRequest => write!(f, "client request failed"),
            ErrorKind::UnexpectedResponse => write!(f, "unexpected response"),
            ErrorKind::ApiResponse => write!(f, "api error"),
            ErrorKind::NotifyChannelAlreadyOpen => write!(f, "notify channel already open"),
            ErrorKind::NotifyChannelOpen => write!(f, "notify channel open failed"),
            ErrorKind::NotifyChannel => write!(f, "notify channel error"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
