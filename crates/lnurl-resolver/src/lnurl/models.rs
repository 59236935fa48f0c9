use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

use super::{
    auth::LnurlAuthRequestDetails, channel::LnurlChannelRequestDetails,
    pay::LnurlPayRequestDetails, withdraw::LnurlWithdrawRequestDetails,
};

/// Value of the `status` field an endpoint uses to report a failure.
pub const ERROR_STATUS: &str = "ERROR";

/// The `tag` values this resolver understands, either in the LNURL query string (`login`,
/// `withdrawRequest`) or in a fetched response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum LnurlTag {
    Login,
    WithdrawRequest,
    PayRequest,
    ChannelRequest,
}

impl LnurlTag {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// The application-level failure an LNURL endpoint reports as
/// `{"status": "ERROR", "reason": "error details..."}`.
///
/// Described in LUD-03 <https://github.com/lnurl/luds/blob/luds/03.md>
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct LnurlErrorResponse {
    /// The URL that was queried.
    pub url: String,
    /// Freetext reason given by the endpoint, empty when none was given.
    pub reason: String,
    pub status: String,
}

impl LnurlErrorResponse {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
            status: ERROR_STATUS.to_string(),
        }
    }
}

impl fmt::Display for LnurlErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reason, self.url)
    }
}

/// What an LNURL resolves to: the subprotocol the endpoint implements, together with the
/// parameters needed to continue it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LnurlDescriptor {
    /// LUD-04 challenge taken from the query string. No request is made to resolve it.
    Auth(LnurlAuthRequestDetails),
    /// LUD-08 withdraw offer fully embedded in the query string.
    FastWithdraw(LnurlWithdrawRequestDetails),
    /// LUD-03 withdraw offer returned by the endpoint.
    Withdraw(LnurlWithdrawRequestDetails),
    /// LUD-06 pay request returned by the endpoint.
    Pay(LnurlPayRequestDetails),
    /// LUD-02 channel request returned by the endpoint.
    Channel(LnurlChannelRequestDetails),
}

impl LnurlDescriptor {
    /// The tag of the subprotocol this descriptor belongs to.
    pub fn tag(&self) -> LnurlTag {
        match self {
            Self::Auth(_) => LnurlTag::Login,
            Self::FastWithdraw(_) | Self::Withdraw(_) => LnurlTag::WithdrawRequest,
            Self::Pay(_) => LnurlTag::PayRequest,
            Self::Channel(_) => LnurlTag::ChannelRequest,
        }
    }
}

/// Successful outcome of a resolution.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ResolvedLnurl {
    /// The http(s) URL the input was normalized to.
    pub url: String,
    pub descriptor: LnurlDescriptor,
}
