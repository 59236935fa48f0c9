//! Classification of user input into the http(s) URL an LNURL resolves against.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use tracing::debug;
use url::Url;

use crate::lnurl::{
    decode_lnurl_bech32,
    error::{LnurlError, LnurlResult},
    find_lnurl_in_text, normalize_lnurl_scheme,
};

const LIGHTNING_PREFIX: &str = "lightning:";

static INTERNET_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9._+-]+)@([A-Za-z0-9.-]+\.[A-Za-z0-9-]+(?::[0-9]{1,5})?)$").unwrap()
});

/// The `name@domain` identifier of a lightning address.
///
/// See <https://github.com/lnurl/luds/blob/luds/16.md>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InternetIdentifier {
    pub name: String,
    pub domain: String,
}

impl InternetIdentifier {
    pub fn parse(input: &str) -> Option<Self> {
        let captures = INTERNET_IDENTIFIER.captures(input)?;
        Some(Self {
            name: captures.get(1)?.as_str().to_string(),
            domain: captures.get(2)?.as_str().to_string(),
        })
    }

    /// Tor hidden services are only reachable over plain http.
    pub fn is_onion(&self) -> bool {
        let host = self.domain.split(':').next().unwrap_or_default();
        host.to_ascii_lowercase().ends_with(".onion")
    }

    /// The LNURL-pay endpoint the identifier points to.
    pub fn lnurlp_url(&self) -> String {
        let scheme = if self.is_onion() { "http" } else { "https" };
        format!("{scheme}://{}/.well-known/lnurlp/{}", self.domain, self.name)
    }
}

impl fmt::Display for InternetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.domain)
    }
}

/// Input reduced to the URL the resolver works on.
#[derive(Clone, Debug)]
pub struct NormalizedInput {
    /// The URL as it will be requested.
    pub url: String,
    pub parsed: Url,
    /// Set when the input was a lightning address.
    pub lightning_address: Option<String>,
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then_some(&input[prefix.len()..])
}

/// Turns raw input into a canonical http(s) URL.
///
/// The first matching form wins:
/// 1. a lightning address, resolved to its `/.well-known/lnurlp/` endpoint
/// 2. an http(s) URL, used as is
/// 3. a LUD-17 URL (`lnurlp://`, `lnurlw://`, ...), rewritten to http(s)
/// 4. text containing a bech32-encoded lnurl, which is decoded
pub fn normalize(input: &str) -> LnurlResult<NormalizedInput> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LnurlError::EmptyInput);
    }
    let candidate = strip_prefix_ignore_case(trimmed, LIGHTNING_PREFIX).unwrap_or(trimmed);

    let mut lightning_address = None;
    let url = if let Some(identifier) = InternetIdentifier::parse(candidate) {
        debug!("Input is a lightning address: {identifier}");
        lightning_address = Some(identifier.to_string());
        identifier.lnurlp_url()
    } else if candidate.starts_with("http") {
        debug!("Input is an http(s) url");
        candidate.to_string()
    } else if let Some(url) = normalize_lnurl_scheme(candidate) {
        debug!("Input is a LUD-17 url");
        url
    } else {
        let Some(lnurl) = find_lnurl_in_text(candidate) else {
            return Err(LnurlError::InvalidLnurl(input.to_string()));
        };
        debug!("Input contains a bech32-encoded lnurl");
        let decoded = decode_lnurl_bech32(&lnurl)?;
        normalize_lnurl_scheme(&decoded).unwrap_or(decoded)
    };

    let parsed = Url::parse(&url)?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(LnurlError::UnsupportedScheme(scheme.to_string())),
    }

    Ok(NormalizedInput {
        url,
        parsed,
        lightning_address,
    })
}
