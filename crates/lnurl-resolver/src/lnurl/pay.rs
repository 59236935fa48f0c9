use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ensure_sdk;

use super::{
    error::{LnurlError, LnurlResult},
    json::{FieldReader, JsonReader},
    models::LnurlTag,
};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LnurlPayRequestDetails {
    pub callback: String,
    /// The minimum amount, in millisats, that this LNURL-pay endpoint accepts
    pub min_sendable: u64,
    /// The maximum amount, in millisats, that this LNURL-pay endpoint accepts
    pub max_sendable: u64,
    /// As per LUD-06, `metadata` is a raw string (e.g. a json representation of the inner map).
    /// It is kept exactly as received since its hash is committed to by the invoice.
    /// Use `metadata_vec()` to get the parsed items.
    #[serde(rename = "metadata")]
    pub metadata_str: String,
    /// The comment length accepted by this endpoint, 0 when comments are not allowed
    ///
    /// See <https://github.com/lnurl/luds/blob/luds/12.md>
    pub comment_allowed: u16,

    /// Indicates the domain of the LNURL-pay service, to be shown to the user when asking for
    /// payment input, as per LUD-06 spec.
    ///
    /// Note: this is not the domain of the callback, but the domain of the LNURL-pay endpoint.
    pub domain: String,

    pub url: String,

    /// Optional lightning address if that was used to resolve the lnurl.
    pub address: Option<String>,

    /// Value indicating whether the recipient supports Nostr Zaps through NIP-57.
    ///
    /// See <https://github.com/nostr-protocol/nips/blob/master/57.md>
    pub allows_nostr: Option<bool>,
    /// Optional recipient's lnurl provider's Nostr pubkey for NIP-57. If it exists it should be a
    /// valid BIP 340 public key in hex.
    ///
    /// See <https://github.com/nostr-protocol/nips/blob/master/57.md>
    pub nostr_pubkey: Option<String>,
}

/// One `[mime type, content]` entry of the LUD-06 metadata array.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataItem {
    pub key: String,
    pub value: String,
}

impl LnurlPayRequestDetails {
    /// Parses `metadata_str` into its entries.
    pub fn metadata_vec(&self) -> LnurlResult<Vec<MetadataItem>> {
        let raw: Vec<Vec<serde_json::Value>> =
            serde_json::from_str(&self.metadata_str).map_err(|e| {
                LnurlError::invalid_field(LnurlTag::PayRequest.as_str(), "metadata", e.to_string())
            })?;
        Ok(raw
            .into_iter()
            .filter_map(|entry| match entry.as_slice() {
                [serde_json::Value::String(key), serde_json::Value::String(value), ..] => {
                    Some(MetadataItem {
                        key: key.clone(),
                        value: value.clone(),
                    })
                }
                _ => None,
            })
            .collect())
    }

    /// The mandatory `text/plain` short description.
    pub fn description(&self) -> Option<String> {
        self.metadata_vec()
            .ok()?
            .into_iter()
            .find(|item| item.key == "text/plain")
            .map(|item| item.value)
    }

    pub fn is_amount_valid(&self, amount_msat: u64) -> bool {
        amount_msat >= self.min_sendable && amount_msat <= self.max_sendable
    }
}

/// Projects a `payRequest` response body, as per <https://github.com/lnurl/luds/blob/luds/06.md>
///
/// `domain`, `url` and `address` describe the queried endpoint rather than the body, and are
/// left empty for the caller to fill in.
pub fn parse_pay_response(json: &JsonReader) -> LnurlResult<LnurlPayRequestDetails> {
    let tag = LnurlTag::PayRequest.as_str();
    let fields = FieldReader { tag, json };

    let callback = fields.required_url("callback")?;
    let min_sendable = fields.required_u64("minSendable")?;
    let max_sendable = fields.required_u64("maxSendable")?;
    ensure_sdk!(
        min_sendable <= max_sendable,
        LnurlError::invalid_field(
            tag,
            "minSendable",
            format!("{min_sendable} is larger than maxSendable {max_sendable}"),
        )
    );
    let metadata_str = fields.required_string("metadata")?;
    let comment_allowed = match fields.optional_u64("commentAllowed")? {
        None => 0,
        Some(len) => u16::try_from(len).unwrap_or_else(|_| {
            warn!("commentAllowed {len} is out of range, capping it");
            u16::MAX
        }),
    };

    Ok(LnurlPayRequestDetails {
        callback,
        min_sendable,
        max_sendable,
        metadata_str,
        comment_allowed,
        domain: String::new(),
        url: String::new(),
        address: None,
        allows_nostr: json.bool("allowsNostr"),
        nostr_pubkey: json.string("nostrPubkey"),
    })
}
