//! Resolves LNURLs, lightning addresses and LUD-17 URLs into the LNURL subprotocol their
//! endpoint implements.

pub mod config;
pub mod input;
pub mod lnurl;
mod resolver;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::ResolverConfig;
pub use lnurl::{
    decode_lnurl_bech32, encode_lnurl_to_bech32,
    error::{LnurlError, LnurlErrorKind, LnurlResult},
    find_lnurl_in_text,
    models::{LnurlDescriptor, LnurlErrorResponse, LnurlTag, ResolvedLnurl},
};
pub use resolver::{LnurlResolver, postflight, preflight, resolve};
