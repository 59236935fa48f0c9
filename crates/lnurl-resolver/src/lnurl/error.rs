use platform_utils::HttpError;
use thiserror::Error;

use super::models::LnurlErrorResponse;

pub type LnurlResult<T, E = LnurlError> = Result<T, E>;

/// Broad classes of resolution failures.
///
/// Every [`LnurlError`] belongs to exactly one class, which tells a caller whether the input,
/// the transport or the remote service is at fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum LnurlErrorKind {
    /// The input itself is invalid. Not retryable.
    Decode,
    /// The resolved URL could not be reached. May be retried by the caller.
    Fetch,
    /// The endpoint understood the request and reported a failure.
    Application,
    /// The endpoint answered with a tag this resolver does not handle.
    UnknownTag,
    /// A recognized response is missing a required field or has a malformed one.
    Validation,
}

#[derive(Debug, Error, Clone)]
pub enum LnurlError {
    #[error("empty input")]
    EmptyInput,
    #[error("invalid bech32-encoded lnurl: {0}")]
    InvalidLnurl(String),
    #[error("lnurl bech32 error: {0}")]
    Bech32(String),
    #[error("lnurl has invalid uri: {0}")]
    InvalidUri(String),
    #[error("lnurl has unsupported scheme: {0}")]
    UnsupportedScheme(String),
    #[error("error calling lnurl endpoint {url}: {source}")]
    ServiceConnectivity {
        url: String,
        #[source]
        source: HttpError,
    },
    #[error("endpoint error: {0}")]
    EndpointError(LnurlErrorResponse),
    #[error("unknown response tag {body}")]
    UnknownTag { body: String },
    #[error("lnurl missing k1 parameter")]
    MissingK1,
    #[error("lnurl {tag} response is missing field `{field}`")]
    MissingField { tag: String, field: String },
    #[error("lnurl {tag} response has invalid field `{field}`: {reason}")]
    InvalidField {
        tag: String,
        field: String,
        reason: String,
    },
    #[error("lnurl has invalid response: {0}")]
    InvalidResponse(String),
}

impl LnurlError {
    pub fn invalid_uri(msg: impl Into<String>) -> Self {
        Self::InvalidUri(msg.into())
    }

    pub fn missing_field(tag: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            tag: tag.into(),
            field: field.into(),
        }
    }

    pub fn invalid_field(
        tag: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            tag: tag.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn service_connectivity(url: impl Into<String>, source: HttpError) -> Self {
        Self::ServiceConnectivity {
            url: url.into(),
            source,
        }
    }

    pub fn kind(&self) -> LnurlErrorKind {
        match self {
            Self::EmptyInput
            | Self::InvalidLnurl(_)
            | Self::Bech32(_)
            | Self::InvalidUri(_)
            | Self::UnsupportedScheme(_) => LnurlErrorKind::Decode,
            Self::ServiceConnectivity { .. } => LnurlErrorKind::Fetch,
            Self::EndpointError(_) => LnurlErrorKind::Application,
            Self::UnknownTag { .. } => LnurlErrorKind::UnknownTag,
            Self::MissingK1
            | Self::MissingField { .. }
            | Self::InvalidField { .. }
            | Self::InvalidResponse(_) => LnurlErrorKind::Validation,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == LnurlErrorKind::Fetch
    }
}

impl From<url::ParseError> for LnurlError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUri(err.to_string())
    }
}

/// Renders an error followed by its source chain, e.g. `invalid checksum: the checksum residue is
/// not valid for the data`.
fn with_sources(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl From<bech32::primitives::decode::CheckedHrpstringError> for LnurlError {
    fn from(err: bech32::primitives::decode::CheckedHrpstringError) -> Self {
        Self::Bech32(with_sources(&err))
    }
}

impl From<bech32::EncodeError> for LnurlError {
    fn from(err: bech32::EncodeError) -> Self {
        Self::Bech32(with_sources(&err))
    }
}

#[cfg(test)]
mod tests {
    use platform_utils::HttpError;

    use super::{LnurlError, LnurlErrorKind};
    use crate::lnurl::models::LnurlErrorResponse;

    #[test]
    fn test_error_kinds() {
        assert_eq!(LnurlError::EmptyInput.kind(), LnurlErrorKind::Decode);
        assert_eq!(
            LnurlError::InvalidLnurl("garbage".into()).kind(),
            LnurlErrorKind::Decode
        );
        assert_eq!(
            LnurlError::missing_field("payRequest", "callback").kind(),
            LnurlErrorKind::Validation
        );
        assert_eq!(
            LnurlError::UnknownTag { body: "{}".into() }.kind(),
            LnurlErrorKind::UnknownTag
        );

        let envelope = LnurlError::EndpointError(LnurlErrorResponse::new(
            "https://domain.com/lnurl",
            "boom",
        ));
        assert_eq!(envelope.kind(), LnurlErrorKind::Application);
        assert!(!envelope.is_retryable());

        let fetch = LnurlError::service_connectivity(
            "https://domain.com/lnurl",
            HttpError::Timeout("timed out".into()),
        );
        assert_eq!(fetch.kind(), LnurlErrorKind::Fetch);
        assert!(fetch.is_retryable());
    }

    #[test]
    fn test_bech32_errors_keep_their_cause() {
        let hrp = bech32::Hrp::parse("lnurl").unwrap();
        let too_long = bech32::encode::<bech32::Bech32>(hrp, &[b'a'; 1024]).unwrap_err();
        let LnurlError::Bech32(message) = LnurlError::from(too_long) else {
            panic!("expected a bech32 error");
        };
        assert!(message.starts_with("encode error: "), "{message}");
        assert!(message.contains("exceeds maximum"), "{message}");

        let bad_checksum = bech32::primitives::decode::CheckedHrpstring::new::<bech32::Bech32>(
            "lnurl1dp68gurn8ghj7qqqqqq",
        )
        .unwrap_err();
        let LnurlError::Bech32(message) = LnurlError::from(bad_checksum) else {
            panic!("expected a bech32 error");
        };
        assert!(message.starts_with("invalid checksum: "), "{message}");
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = LnurlError::invalid_field("withdrawRequest", "maxWithdrawable", "not a number");
        assert_eq!(
            err.to_string(),
            "lnurl withdrawRequest response has invalid field `maxWithdrawable`: not a number"
        );
    }
}
