use crate::api::error::ApiError;
use crate::api::response_cache::ResponseCache;
use crate::api::retry::RetryPolicy;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A blocking HTTP session that answers from the response cache when it can, and
/// otherwise fetches with retries and caches the result.
pub struct ForecastSession {
    client: Client,
    cache: ResponseCache,
    retry: RetryPolicy,
}

// Open-Meteo reports request errors as `{"error": true, "reason": "..."}`.
#[derive(Deserialize)]
struct ProviderError {
    reason: String,
}

impl ForecastSession {
    pub fn new(
        cache: ResponseCache,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::ClientBuild)?;
        Ok(Self {
            client,
            cache,
            retry,
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Response body for `url`, from cache or network.
    pub fn get(&self, url: &Url) -> Result<String, ApiError> {
        if let Some(body) = self.cache.get(url.as_str())? {
            info!("Cache hit for {}", url);
            return Ok(body);
        }
        info!("Cache miss for {}. Requesting from provider.", url);

        let body = self.retry.run(url.as_str(), || self.send(url))?;
        self.cache.put(url.as_str(), &body)?;
        Ok(body)
    }

    fn send(&self, url: &Url) -> Result<String, ApiError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| ApiError::NetworkRequest(url.to_string(), e))?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .text()
                .ok()
                .and_then(|body| serde_json::from_str::<ProviderError>(&body).ok())
                .map(|e| e.reason);
            warn!("HTTP error for {}: {} {:?}", url, status, reason);
            return Err(ApiError::HttpStatus {
                url: url.to_string(),
                status,
                reason,
            });
        }

        response
            .text()
            .map_err(|e| ApiError::NetworkRequest(url.to_string(), e))
    }
}
