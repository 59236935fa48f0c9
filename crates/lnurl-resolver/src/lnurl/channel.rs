use serde::{Deserialize, Serialize};

use super::{
    error::LnurlResult,
    json::{FieldReader, JsonReader},
    models::LnurlTag,
};

/// Parameters of an LNURL-channel request.
///
/// See <https://github.com/lnurl/luds/blob/luds/02.md>
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LnurlChannelRequestDetails {
    /// Remote node address of the form `node_key@ip_address:port_number`
    pub uri: String,
    pub callback: String,
    pub k1: Option<String>,
}

pub fn parse_channel_response(json: &JsonReader) -> LnurlResult<LnurlChannelRequestDetails> {
    let fields = FieldReader {
        tag: LnurlTag::ChannelRequest.as_str(),
        json,
    };

    Ok(LnurlChannelRequestDetails {
        uri: fields.required_string("uri")?,
        callback: fields.required_url("callback")?,
        k1: json.string("k1"),
    })
}
