//! HTTP subscription source against the billing API

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{SourceError, SubscriptionSource};
use crate::subscription::Subscription;

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Body of `GET {base}/users/{id}/subscription`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

/// Blocking JSON client. One request per lookup, no retries.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, SourceError> {
        Self::with_timeout(base_url, token, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wayfare/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl SubscriptionSource for HttpSource {
    fn subscription(&self, user_id: &str) -> Result<Option<Subscription>, SourceError> {
        let url = subscription_url(&self.base_url, user_id)?;

        let mut req = self.client.get(url);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .map_err(|e| SourceError::Network(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        decode_response(status, &body)
    }
}

/// Builds `{base}/users/{user_id}/subscription`, escaping the user id.
pub fn subscription_url(base_url: &str, user_id: &str) -> Result<reqwest::Url, SourceError> {
    let mut url = reqwest::Url::parse(base_url)
        .map_err(|e| SourceError::Unavailable(format!("invalid base url '{base_url}': {e}")))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| SourceError::Unavailable(format!("invalid base url '{base_url}'")))?;
        segments
            .pop_if_empty()
            .extend(["users", user_id, "subscription"]);
    }
    Ok(url)
}

/// Maps a billing API response to a lookup result.
///
/// 404 means the user has no subscription. Any other non-2xx status or an
/// unparseable body is an error, never an empty subscription.
pub fn decode_response(status: u16, body: &str) -> Result<Option<Subscription>, SourceError> {
    if status == 404 {
        return Ok(None);
    }
    if !(200..300).contains(&status) {
        return Err(SourceError::Status(status));
    }
    let data: SubscriptionResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;
    Ok(data.subscription)
}
