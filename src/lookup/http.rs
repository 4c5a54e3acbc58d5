//! HTTP implementation of [`CompanyLookup`] on top of reqwest.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::CompanyLookup;
use crate::classifier::RawOutcome;
use crate::config::LookupServiceConfig;
use crate::error::{Error, LookupError, Result};
use crate::types::PhoneNumber;

/// Longest response body kept in a [`LookupError::Status`]
const MAX_ERROR_BODY: usize = 256;

/// Production [`CompanyLookup`] that calls the lookup service over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpCompanyLookup {
    client: reqwest::Client,
    endpoint: url::Url,
    phone_param: String,
    timeout: Duration,
}

impl HttpCompanyLookup {
    /// Build the HTTP client from the lookup service settings
    pub fn new(config: &LookupServiceConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;

        let mut headers = HeaderMap::new();
        if let Some(auth) = &config.auth_header {
            let value = HeaderValue::from_str(auth).map_err(|e| {
                Error::config("lookup.auth_header", format!("invalid header value: {e}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            phone_param: config.phone_param.clone(),
            timeout: config.request_timeout,
        })
    }

    fn request_url(&self, phone_number: &PhoneNumber) -> url::Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair(&self.phone_param, phone_number.as_str());
        url
    }
}

#[async_trait::async_trait]
impl CompanyLookup for HttpCompanyLookup {
    async fn lookup(&self, phone_number: &PhoneNumber) -> RawOutcome {
        let url = self.request_url(phone_number);

        // The client timeout covers the request; this one also bounds the body read
        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| LookupError::Timeout(self.timeout))?
            .map_err(|e| LookupError::from_reqwest(&e, self.timeout))?;

        let status = response.status();
        let body = tokio::time::timeout(self.timeout, response.text())
            .await
            .map_err(|_| LookupError::Timeout(self.timeout))?
            .map_err(|e| LookupError::from_reqwest(&e, self.timeout))?;

        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        serde_json::from_str(&body).map_err(|e| LookupError::Malformed(e.to_string()))
    }
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
