use std::str::FromStr;

use platform_utils::{DefaultHttpClient, HttpClient, HttpError, HttpResponse};
use tracing::{debug, trace, warn};

use crate::{
    config::ResolverConfig,
    input::{NormalizedInput, normalize},
    lnurl::{
        auth::{self, query_param},
        channel::parse_channel_response,
        error::{LnurlError, LnurlResult},
        json::JsonReader,
        models::{ERROR_STATUS, LnurlDescriptor, LnurlErrorResponse, LnurlTag, ResolvedLnurl},
        pay::{LnurlPayRequestDetails, parse_pay_response},
        withdraw::{parse_fast_withdraw, parse_withdraw_response},
    },
};

/// Resolves an lnurl, lightning address or LUD-17 URL with the default HTTP client.
///
/// See [`LnurlResolver::resolve`].
pub async fn resolve(input: &str) -> LnurlResult<ResolvedLnurl> {
    LnurlResolver::new(DefaultHttpClient::default())
        .resolve(input)
        .await
}

pub struct LnurlResolver<C = DefaultHttpClient> {
    http_client: C,
}

impl LnurlResolver<DefaultHttpClient> {
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(
            DefaultHttpClient::new(config.user_agent.clone()).with_timeout(config.timeout_secs),
        )
    }
}

impl<C> LnurlResolver<C>
where
    C: HttpClient,
{
    pub fn new(http_client: C) -> Self {
        LnurlResolver { http_client }
    }

    /// Resolves `input` into the LNURL subprotocol its endpoint implements.
    ///
    /// `tag=login` links and fast withdraw links are answered from the query string alone.
    /// Anything else is fetched once and the response body decides the subprotocol.
    pub async fn resolve(&self, input: &str) -> LnurlResult<ResolvedLnurl> {
        let endpoint = normalize(input)?;

        if let Some(descriptor) = preflight(&endpoint)? {
            return Ok(ResolvedLnurl {
                url: endpoint.url,
                descriptor,
            });
        }

        let response = self
            .http_client
            .get(endpoint.url.clone(), None)
            .await
            .map_err(|e| LnurlError::service_connectivity(&endpoint.url, e))?;
        let descriptor = postflight(&endpoint, &response)?;
        Ok(ResolvedLnurl {
            url: endpoint.url,
            descriptor,
        })
    }
}

/// Dispatches on the `tag` query parameter of the normalized URL, before any request is made.
///
/// Returns `None` when the URL has to be fetched.
pub fn preflight(endpoint: &NormalizedInput) -> LnurlResult<Option<LnurlDescriptor>> {
    let tag = query_param(&endpoint.parsed, "tag");
    match tag.as_deref().map(LnurlTag::from_str) {
        Some(Ok(LnurlTag::Login)) => {
            debug!("Resolving lnurl auth from the query string");
            let auth_request = auth::validate_request(&endpoint.parsed)?;
            Ok(Some(LnurlDescriptor::Auth(auth::LnurlAuthRequestDetails {
                url: endpoint.url.clone(),
                ..auth_request
            })))
        }
        Some(Ok(LnurlTag::WithdrawRequest)) => match parse_fast_withdraw(&endpoint.parsed) {
            Some(withdraw_request) => {
                debug!("Resolving fast lnurl withdraw from the query string");
                Ok(Some(LnurlDescriptor::FastWithdraw(withdraw_request)))
            }
            None => Ok(None),
        },
        _ => Ok(None),
    }
}

/// Dispatches on the body fetched from the normalized URL.
pub fn postflight(
    endpoint: &NormalizedInput,
    response: &HttpResponse,
) -> LnurlResult<LnurlDescriptor> {
    trace!("lnurl response body: {}", response.body);
    let status_error = || {
        LnurlError::service_connectivity(
            &endpoint.url,
            HttpError::Status {
                status: response.status,
                body: response.body.clone(),
            },
        )
    };

    let json = match JsonReader::parse(&response.body) {
        Ok(json) => json,
        Err(_) if !response.is_success() => return Err(status_error()),
        Err(e) => return Err(e),
    };

    if json.string("status").as_deref() == Some(ERROR_STATUS) {
        let reason = json.string("reason").unwrap_or_default();
        warn!("lnurl endpoint {} returned an error: {reason}", endpoint.url);
        return Err(LnurlError::EndpointError(LnurlErrorResponse::new(
            &endpoint.url,
            reason,
        )));
    }

    if !response.is_success() {
        return Err(status_error());
    }

    let tag = json.string("tag");
    debug!("lnurl endpoint answered with tag {tag:?}");
    match tag.as_deref().map(LnurlTag::from_str) {
        Some(Ok(LnurlTag::WithdrawRequest)) => {
            Ok(LnurlDescriptor::Withdraw(parse_withdraw_response(&json)?))
        }
        Some(Ok(LnurlTag::PayRequest)) => {
            let pay_request = parse_pay_response(&json)?;
            let domain = endpoint
                .parsed
                .host_str()
                .ok_or_else(|| LnurlError::invalid_uri("lnurl pay uri has no domain"))?
                .to_string();
            Ok(LnurlDescriptor::Pay(LnurlPayRequestDetails {
                domain,
                url: endpoint.url.clone(),
                address: endpoint.lightning_address.clone(),
                ..pay_request
            }))
        }
        Some(Ok(LnurlTag::ChannelRequest)) => {
            Ok(LnurlDescriptor::Channel(parse_channel_response(&json)?))
        }
        _ => {
            warn!("lnurl endpoint {} returned an unknown tag", endpoint.url);
            Err(LnurlError::UnknownTag {
                body: response.body.clone(),
            })
        }
    }
}
