use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::ensure_sdk;

use super::{
    auth::query_param,
    error::{LnurlError, LnurlResult},
    json::{FieldReader, JsonReader},
    models::LnurlTag,
};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LnurlWithdrawRequestDetails {
    pub callback: String,
    pub k1: String,
    pub default_description: String,
    /// The minimum amount, in millisats, that this LNURL-withdraw endpoint accepts
    pub min_withdrawable: u64,
    /// The maximum amount, in millisats, that this LNURL-withdraw endpoint accepts
    pub max_withdrawable: u64,
}

impl LnurlWithdrawRequestDetails {
    pub fn is_amount_valid(&self, amount_sats: u64) -> bool {
        let amount_msat = amount_sats.saturating_mul(1000);
        amount_msat >= self.min_withdrawable && amount_msat <= self.max_withdrawable
    }
}

/// Projects a `withdrawRequest` response body, as per
/// <https://github.com/lnurl/luds/blob/luds/03.md>
pub fn parse_withdraw_response(json: &JsonReader) -> LnurlResult<LnurlWithdrawRequestDetails> {
    let tag = LnurlTag::WithdrawRequest.as_str();
    let fields = FieldReader { tag, json };

    let callback = fields.required_url("callback")?;
    let k1 = fields.required_string("k1")?;
    let min_withdrawable = fields.required_u64("minWithdrawable")?;
    let max_withdrawable = fields.required_u64("maxWithdrawable")?;
    ensure_sdk!(
        min_withdrawable <= max_withdrawable,
        LnurlError::invalid_field(
            tag,
            "minWithdrawable",
            format!("{min_withdrawable} is larger than maxWithdrawable {max_withdrawable}"),
        )
    );

    Ok(LnurlWithdrawRequestDetails {
        callback,
        k1,
        default_description: json.string("defaultDescription").unwrap_or_default(),
        min_withdrawable,
        max_withdrawable,
    })
}

/// Reads a withdraw offer embedded in the link itself (LUD-08 fast withdraw).
///
/// Returns `None` whenever the offer is incomplete or malformed, in which case the link has to be
/// fetched like any other.
pub fn parse_fast_withdraw(url: &Url) -> Option<LnurlWithdrawRequestDetails> {
    let k1 = query_param(url, "k1").filter(|k1| !k1.is_empty())?;
    let callback = query_param(url, "callback").filter(|cb| !cb.is_empty())?;
    if Url::parse(&callback).is_err() {
        debug!("Fast withdraw callback is not a valid url: {callback}");
        return None;
    }

    let amount = |name: &str| match query_param(url, name) {
        None => Some(0),
        Some(value) => value.parse::<u64>().ok(),
    };
    let min_withdrawable = amount("minWithdrawable")?;
    let max_withdrawable = amount("maxWithdrawable")?;
    if min_withdrawable > max_withdrawable {
        debug!("Fast withdraw has inconsistent range {min_withdrawable}..{max_withdrawable}");
        return None;
    }

    Some(LnurlWithdrawRequestDetails {
        callback,
        k1,
        default_description: query_param(url, "defaultDescription").unwrap_or_default(),
        min_withdrawable,
        max_withdrawable,
    })
}
