use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;
use url::Url;

use super::error::{LnurlError, LnurlResult};

/// Wrapped in a [`LnurlDescriptor::Auth`](super::models::LnurlDescriptor::Auth), this is the
/// result of resolving an LNURL-auth link.
///
/// It is built entirely from the link's query string. The `url` is what the wallet later extends
/// with the signed challenge and its linking key.
///
/// See <https://github.com/lnurl/luds/blob/luds/04.md>
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LnurlAuthRequestDetails {
    /// Challenge to be signed, as found in the link
    pub k1: String,

    /// When available, one of: register, login, link, auth
    pub action: Option<String>,

    /// Indicates the domain of the LNURL-auth service, to be shown to the user when asking for
    /// auth confirmation, as per LUD-04 spec.
    pub domain: String,

    /// Indicates the URL of the LNURL-auth service, including the query arguments.
    pub url: String,
}

/// The `action` values defined by LUD-04.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LnurlAuthAction {
    Register,
    Login,
    Link,
    Auth,
}

impl LnurlAuthRequestDetails {
    /// The parsed `action`, when it is one LUD-04 defines.
    pub fn known_action(&self) -> Option<LnurlAuthAction> {
        self.action.as_deref().and_then(|a| a.parse().ok())
    }
}

pub(crate) fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, v)| v.into_owned())
}

/// Builds the auth request from a `tag=login` URL.
///
/// Unknown actions are kept, not rejected, so newer services keep working.
pub fn validate_request(url: &Url) -> LnurlResult<LnurlAuthRequestDetails> {
    let k1 = query_param(url, "k1")
        .filter(|k1| !k1.is_empty())
        .ok_or(LnurlError::MissingK1)?;
    let action = query_param(url, "action");
    let domain = url
        .host_str()
        .ok_or_else(|| LnurlError::invalid_uri("lnurl auth uri has no domain"))?
        .to_string();

    if let Some(action) = &action
        && action.parse::<LnurlAuthAction>().is_err()
    {
        debug!("Passing through unknown lnurl auth action: {action}");
    }

    Ok(LnurlAuthRequestDetails {
        k1,
        action,
        domain,
        url: url.to_string(),
    })
}
