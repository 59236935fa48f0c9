//! HTTP error types for platform-utils.

use thiserror::Error;

/// HTTP client error type with rich variants for different error conditions.
#[derive(Clone, Debug, Error)]
pub enum HttpError {
    #[error("Redirect error: {0}")]
    Redirect(String),
    #[error("Status error: {status} - {body}")]
    Status { status: u16, body: String },
    #[error("Timeout error: {0}")]
    Timeout(String),
    #[error("Request error: {0}")]
    Request(String),
    #[error("Connect error: {0}")]
    Connect(String),
    #[error("Body error: {0}")]
    Body(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Other error: {0}")]
    Other(String),
}

impl HttpError {
    /// Returns the HTTP status code if this error contains one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<bitreq::Error> for HttpError {
    fn from(err: bitreq::Error) -> Self {
        let err_str = format!("{err:?}");
        match &err {
            bitreq::Error::IoError(io_err) => {
                if io_err.kind() == std::io::ErrorKind::TimedOut {
                    Self::Timeout(err_str)
                } else {
                    Self::Connect(err_str)
                }
            }
            bitreq::Error::InvalidUtf8InBody(_) | bitreq::Error::InvalidUtf8InResponse => {
                Self::Decode(err_str)
            }
            bitreq::Error::TooManyRedirections
            | bitreq::Error::InfiniteRedirectionLoop
            | bitreq::Error::RedirectLocationMissing => Self::Redirect(err_str),
            bitreq::Error::AddressNotFound => Self::Connect(err_str),
            bitreq::Error::InvalidUrl(_) => Self::Request(err_str),
            bitreq::Error::BodyOverflow => Self::Body(err_str),
            bitreq::Error::Other(msg) => Self::Other((*msg).to_string()),
            _ => Self::Other(err_str),
        }
    }
}
