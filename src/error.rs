// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Storage(String),
    Translation(String),
    Transport(TransportError),
    Download(String),
}

/// Failures of an outbound HTTP exchange (email API, bundle or file fetch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    Request(String),

    /// The remote answered with a non-success status.
    Status { code: u16, body: String },

    /// The request URL could not be parsed.
    InvalidUrl(String),
}

impl TransportError {
    /// Returns the i18n key of the inline status text shown for this failure.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            TransportError::Request(_) => "status.networkError",
            TransportError::Status { .. } => "status.serverError",
            TransportError::InvalidUrl(_) => "status.invalidUrl",
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(msg) => write!(f, "request failed: {}", msg),
            TransportError::Status { code, body } if body.is_empty() => {
                write!(f, "HTTP status {}", code)
            }
            TransportError::Status { code, body } => write!(f, "HTTP status {}: {}", code, body),
            TransportError::InvalidUrl(url) => write!(f, "invalid URL: {}", url),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Storage(e) => write!(f, "Storage Error: {}", e),
            Error::Translation(e) => write!(f, "Translation Error: {}", e),
            Error::Transport(e) => write!(f, "Transport Error: {}", e),
            Error::Download(e) => write!(f, "Download Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// i18n key describing a transport failure, if this is one.
    pub fn i18n_key(&self) -> Option<&'static str> {
        match self {
            Error::Transport(err) => Some(err.i18n_key()),
            _ => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::Transport(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Translation(err.to_string())
    }
}

impl<T: fmt::Debug> From<ciborium::de::Error<T>> for Error {
    fn from(err: ciborium::de::Error<T>) -> Self {
        Error::Storage(err.to_string())
    }
}

impl<T: fmt::Debug> From<ciborium::ser::Error<T>> for Error {
    fn from(err: ciborium::ser::Error<T>) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::Transport(TransportError::Status {
                code: status.as_u16(),
                body: String::new(),
            }),
            None => Error::Transport(TransportError::Request(err.to_string())),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
