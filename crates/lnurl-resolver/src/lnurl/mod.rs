pub mod auth;
pub mod channel;
pub mod error;
pub mod json;
pub mod models;
pub mod pay;
pub mod withdraw;

use std::sync::LazyLock;

use bech32::{Bech32, Checksum, Hrp, primitives::decode::CheckedHrpstring};
use regex::Regex;

use error::{LnurlError, LnurlResult};

pub(crate) const LNURL_HRP: &str = "lnurl";

/// LUD-17 scheme prefixes that stand in for http(s).
pub(crate) const LNURL_SCHEME_PREFIXES: [&str; 5] =
    ["lnurlp://", "lnurlw://", "lnurla://", "lnurlc://", "keyauth://"];

/// HRP followed by the separator and at least one character of the bech32 alphabet.
static LNURL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)lnurl1[02-9ac-hj-np-z]+").unwrap());

/// The bech32 checksum with no limit on the string length.
///
/// LNURLs carry whole URLs and routinely exceed the 90 character limit of BIP-173 as well as
/// the 1023 character code length of [`Bech32`]. Bech32m checksums are not valid LNURLs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LnurlChecksum {}

impl Checksum for LnurlChecksum {
    type MidstateRepr = u32;
    const CODE_LENGTH: usize = usize::MAX;
    const CHECKSUM_LENGTH: usize = Bech32::CHECKSUM_LENGTH;
    const GENERATOR_SH: [u32; 5] = Bech32::GENERATOR_SH;
    const TARGET_RESIDUE: u32 = Bech32::TARGET_RESIDUE;
}

fn has_prefix_ignore_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(prefix))
}

/// Converts a LUD-17 scheme URL (e.g. `lnurlp://`, `lnurlw://`, `keyauth://`) to its
/// corresponding http(s) URL. Everything after the first colon is kept as is.
///
/// Uses `http:` when the URL points to an `.onion` host, `https:` otherwise. Returns `None` when
/// `url` does not start with one of the LUD-17 schemes.
pub(crate) fn normalize_lnurl_scheme(url: &str) -> Option<String> {
    if !LNURL_SCHEME_PREFIXES
        .iter()
        .any(|prefix| has_prefix_ignore_case(url, prefix))
    {
        return None;
    }

    let (_, location) = url.split_once(':')?;
    let scheme = if url.contains(".onion/") || url.ends_with(".onion") {
        "http:"
    } else {
        "https:"
    };
    Some(format!("{scheme}{location}"))
}

/// Encodes an lnurl as a bech32 string.
///
/// LUD-17 scheme prefixes (`lnurlp://`, `lnurlw://`, `lnurla://`, `lnurlc://`, `keyauth://`)
/// are converted to their http(s) URL before encoding.
pub fn encode_lnurl_to_bech32(lnurl: &str) -> LnurlResult<String> {
    let normalized = normalize_lnurl_scheme(lnurl).unwrap_or_else(|| lnurl.to_string());
    let hrp = Hrp::parse(LNURL_HRP).map_err(|e| LnurlError::Bech32(e.to_string()))?;
    Ok(bech32::encode_lower::<LnurlChecksum>(hrp, normalized.as_bytes())?)
}

/// Decodes a bech32-encoded lnurl into the URL it carries.
///
/// Fails on a bad or bech32m checksum, on any human-readable prefix other than `lnurl` and on
/// payloads that are not UTF-8.
pub fn decode_lnurl_bech32(encoded: &str) -> LnurlResult<String> {
    let checked = CheckedHrpstring::new::<LnurlChecksum>(encoded)?;
    let hrp = checked.hrp();
    if hrp.to_lowercase() != LNURL_HRP {
        return Err(LnurlError::Bech32(format!(
            "unexpected human-readable prefix: {hrp}"
        )));
    }

    String::from_utf8(checked.byte_iter().collect())
        .map_err(|e| LnurlError::Bech32(e.to_string()))
}

/// Looks for the first bech32-encoded lnurl inside free text, e.g. a `lightning:` URI or a
/// message that was pasted whole.
///
/// Candidates that look like an lnurl but fail to decode are skipped.
pub fn find_lnurl_in_text(text: &str) -> Option<String> {
    LNURL_TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|candidate| decode_lnurl_bech32(candidate).is_ok())
        .map(ToString::to_string)
}

#[cfg(test)]
pub(crate) mod tests {
    use bech32::{ByteIterExt, Fe32IterExt};
    use rand::distributions::{Alphanumeric, DistString};
    use rstest::rstest;

    use super::{
        decode_lnurl_bech32, encode_lnurl_to_bech32, find_lnurl_in_text, normalize_lnurl_scheme,
    };
    use crate::lnurl::error::LnurlError;

    /// LUD-01 example.
    pub(crate) const LUD01_LNURL: &str = "LNURL1DP68GURN8GHJ7UM9WFMXJCM99E3K7MF0V9CXJ0M385EKVCENXC6R2C35XVUKXEFCV5MKVV34X5EKZD3EV56NYD3HXQURZEPEXEJXXEPNXSCRVWFNV9NXZCN9XQ6XYEFHVGCXXCMYXYMNSERXFQ5FNS";
    pub(crate) const LUD01_URL: &str = "https://service.com/api?q=3fc3645b439ce8e7f2553a69e5267081d96dcd340693afabe04be7b0ccd178df";

    pub(crate) fn rand_string(len: usize) -> String {
        Alphanumeric.sample_string(&mut rand::thread_rng(), len)
    }

    #[rstest]
    #[case("lnurlp://domain.com/lnurlp/user", "https://domain.com/lnurlp/user")]
    #[case(
        "lnurlw://domain.com/lnurl-withdraw?k1=abc",
        "https://domain.com/lnurl-withdraw?k1=abc"
    )]
    #[case("lnurla://domain.com/auth", "https://domain.com/auth")]
    #[case("lnurlc://domain.com/channel", "https://domain.com/channel")]
    #[case(
        "keyauth://domain.com/lnurl-login?tag=login&k1=abc",
        "https://domain.com/lnurl-login?tag=login&k1=abc"
    )]
    #[case("LNURLP://domain.com/lnurlp/user", "https://domain.com/lnurlp/user")]
    #[case("lnurlp://example.onion/lnurlp/user", "http://example.onion/lnurlp/user")]
    #[case("lnurlw://example.onion", "http://example.onion")]
    fn test_normalize_lnurl_scheme(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_lnurl_scheme(input).as_deref(), Some(expected));
    }

    #[test]
    fn test_normalize_lnurl_scheme_ignores_other_schemes() {
        assert!(normalize_lnurl_scheme("https://domain.com/lnurlp/user").is_none());
        assert!(normalize_lnurl_scheme("lightning:lnurl1abc").is_none());
        assert!(normalize_lnurl_scheme("lnurlp:domain.com").is_none());
    }

    #[test]
    fn test_decode_lud01_vector() {
        assert_eq!(decode_lnurl_bech32(LUD01_LNURL).unwrap(), LUD01_URL);
        assert_eq!(
            decode_lnurl_bech32(&LUD01_LNURL.to_lowercase()).unwrap(),
            LUD01_URL
        );
        assert_eq!(
            encode_lnurl_to_bech32(LUD01_URL).unwrap(),
            LUD01_LNURL.to_lowercase()
        );
    }

    #[test]
    fn test_encode_decode() {
        for url in [
            format!("https://domain.com/lnurl?k1={}", rand_string(32)),
            "http://example.onion/lnurlp/user".to_string(),
            "https://domain.com/.well-known/lnurlp/user".to_string(),
        ] {
            let encoded = encode_lnurl_to_bech32(&url).unwrap();
            assert!(encoded.starts_with("lnurl1"));
            assert_eq!(decode_lnurl_bech32(&encoded).unwrap(), url);
        }
    }

    #[test]
    fn test_encode_lnurl_to_bech32_normalizes_lnurlp() {
        let from_lnurlp = encode_lnurl_to_bech32("lnurlp://domain.com/path").unwrap();
        let from_https = encode_lnurl_to_bech32("https://domain.com/path").unwrap();
        assert_eq!(from_lnurlp, from_https);
    }

    #[test]
    fn test_encode_lnurl_to_bech32_onion_uses_http() {
        let from_lnurlp = encode_lnurl_to_bech32("lnurlp://example.onion/path").unwrap();
        let from_http = encode_lnurl_to_bech32("http://example.onion/path").unwrap();
        assert_eq!(from_lnurlp, from_http);
    }

    #[test]
    fn test_decode_rejects_bad_checksum() {
        let mut corrupted = LUD01_LNURL.to_lowercase();
        let last = corrupted.pop().unwrap();
        corrupted.push(if last == 'q' { 'p' } else { 'q' });
        assert!(matches!(
            decode_lnurl_bech32(&corrupted),
            Err(LnurlError::Bech32(_))
        ));
    }

    #[test]
    fn test_decode_rejects_other_hrp() {
        let hrp = bech32::Hrp::parse("lnbc").unwrap();
        let encoded =
            bech32::encode::<bech32::Bech32>(hrp, b"https://domain.com/lnurl").unwrap();
        assert!(matches!(
            decode_lnurl_bech32(&encoded),
            Err(LnurlError::Bech32(_))
        ));
    }

    /// Encodes with the stock bech32 checksum, which has no length check when driven by hand.
    fn bech32_reference(url: &str) -> String {
        let hrp = bech32::Hrp::parse("lnurl").unwrap();
        url.bytes()
            .bytes_to_fes()
            .with_checksum::<bech32::Bech32>(&hrp)
            .chars()
            .collect()
    }

    #[rstest]
    #[case(640)]
    #[case(700)]
    #[case(1228)]
    #[case(4096)]
    fn test_long_urls(#[case] len: usize) {
        let url = format!("https://domain.com/lnurl?k1={}", "a".repeat(len));
        let encoded = encode_lnurl_to_bech32(&url).unwrap();
        assert_eq!(encoded, bech32_reference(&url));
        assert_eq!(decode_lnurl_bech32(&encoded).unwrap(), url);
        assert_eq!(
            decode_lnurl_bech32(&encoded.to_uppercase()).unwrap(),
            url
        );

        let text = format!("lightning:{encoded}");
        assert_eq!(find_lnurl_in_text(&text), Some(encoded));
    }

    #[test]
    fn test_short_urls_match_stock_bech32() {
        let hrp = bech32::Hrp::parse("lnurl").unwrap();
        let stock = bech32::encode::<bech32::Bech32>(hrp, LUD01_URL.as_bytes()).unwrap();
        assert_eq!(encode_lnurl_to_bech32(LUD01_URL).unwrap(), stock);
    }

    #[test]
    fn test_decode_rejects_bech32m() {
        let hrp = bech32::Hrp::parse("lnurl").unwrap();
        let encoded = bech32::encode::<bech32::Bech32m>(hrp, b"https://domain.com/x").unwrap();
        assert!(matches!(
            decode_lnurl_bech32(&encoded),
            Err(LnurlError::Bech32(_))
        ));
        assert!(find_lnurl_in_text(&encoded).is_none());
    }

    #[test]
    fn test_find_lnurl_in_text() {
        let text = format!("Scan this to get paid: lightning:{LUD01_LNURL} thanks!");
        assert_eq!(find_lnurl_in_text(&text).as_deref(), Some(LUD01_LNURL));

        let lower = LUD01_LNURL.to_lowercase();
        let text = format!("first lnurl1qqqqqq is broken, then {lower}");
        assert_eq!(find_lnurl_in_text(&text), Some(lower));

        assert!(find_lnurl_in_text("there is no lnurl here").is_none());
        assert!(find_lnurl_in_text("lnurl1").is_none());
    }
}
