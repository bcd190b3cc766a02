//! # Smart JSON Fetching
//!
//! Retrieval of JSON documents from origins that may refuse cross-origin
//! reads: a fast direct attempt first, then every configured proxy raced
//! concurrently under independent timeouts. The direct attempt exploits
//! origins that permit the read at minimal latency cost; racing the
//! proxies bounds tail latency to the fastest proxy instead of summing
//! their timeouts.

use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{AttemptError, AttemptFailure, FetchError};
use crate::proxy::{ProxyEndpoint, ProxyResponseKind, default_proxies};

/// Options for [`fetch_json_smart`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Budget for the direct attempt.
    pub timeout_direct: Duration,
    /// Budget for each proxy attempt, counted independently.
    pub timeout_proxy: Duration,
    /// Whether to try the origin directly before any proxy.
    pub try_direct_first: bool,
    /// Proxy endpoints, raced concurrently once the direct attempt fails.
    pub proxies: Vec<ProxyEndpoint>,
    /// Extra headers sent with every attempt.
    pub headers: HeaderMap,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_direct: Duration::from_millis(2000),
            timeout_proxy: Duration::from_millis(8000),
            try_direct_first: true,
            proxies: default_proxies(),
            headers: HeaderMap::new(),
        }
    }
}

/// Fetch and decode a JSON document, falling back through CORS proxies.
///
/// A failing attempt never aborts its siblings; the first successful
/// attempt wins the race and later completions are discarded. The call
/// rejects only once every strategy has failed, with
/// [`FetchError::Exhausted`] describing each attempt.
pub async fn fetch_json_smart<T>(
    client: &Client,
    url: &str,
    options: &FetchOptions,
) -> Result<T, FetchError>
where
    T: DeserializeOwned,
{
    // Reject unparseable URLs before spending any attempt budget.
    url::Url::parse(url).map_err(|e| FetchError::UrlError(format!("{url}: {e}")))?;

    let mut failures = Vec::new();

    if options.try_direct_first {
        match attempt(
            client,
            url,
            &options.headers,
            options.timeout_direct,
            &ProxyResponseKind::Raw,
        )
        .await
        {
            Ok(value) => {
                debug!(url, "direct fetch succeeded");
                return Ok(value);
            }
            Err(error) => {
                debug!(url, %error, "direct fetch failed, falling back to proxies");
                failures.push(AttemptFailure {
                    strategy: "direct".to_owned(),
                    error,
                });
            }
        }
    }

    let mut race: FuturesUnordered<_> = options
        .proxies
        .iter()
        .map(|proxy| {
            let target = proxy.proxied_url(url);
            async move {
                let outcome = attempt(
                    client,
                    &target,
                    &options.headers,
                    options.timeout_proxy,
                    &proxy.response,
                )
                .await;
                (proxy.base.clone(), outcome)
            }
        })
        .collect();

    while let Some((strategy, outcome)) = race.next().await {
        match outcome {
            Ok(value) => {
                debug!(url, proxy = %strategy, "proxy fetch succeeded");
                return Ok(value);
            }
            Err(error) => {
                debug!(url, proxy = %strategy, %error, "proxy fetch failed");
                failures.push(AttemptFailure { strategy, error });
            }
        }
    }

    warn!(url, attempts = failures.len(), "all fetch attempts failed");
    Err(FetchError::Exhausted(failures))
}

/// One attempt against a single URL, bounded by `budget`.
///
/// Dropping the in-flight request on timeout aborts it without touching
/// sibling attempts.
async fn attempt<T>(
    client: &Client,
    url: &str,
    headers: &HeaderMap,
    budget: Duration,
    response_kind: &ProxyResponseKind,
) -> Result<T, AttemptError>
where
    T: DeserializeOwned,
{
    tokio::time::timeout(budget, attempt_inner(client, url, headers, response_kind))
        .await
        .map_err(|_| AttemptError::Timeout(budget))?
}

async fn attempt_inner<T>(
    client: &Client,
    url: &str,
    headers: &HeaderMap,
    response_kind: &ProxyResponseKind,
) -> Result<T, AttemptError>
where
    T: DeserializeOwned,
{
    let response = client
        .get(url)
        .header(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        )
        .headers(headers.clone())
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AttemptError::Status(status));
    }

    let body = response.bytes().await?;
    decode(&body, response_kind)
}

/// Decode an attempt body, unwrapping a proxy envelope when configured.
fn decode<T>(body: &[u8], response_kind: &ProxyResponseKind) -> Result<T, AttemptError>
where
    T: DeserializeOwned,
{
    match response_kind {
        ProxyResponseKind::Raw => Ok(serde_json::from_slice(body)?),
        ProxyResponseKind::Enveloped { field } => {
            let wrapper: serde_json::Value = serde_json::from_slice(body)?;
            let inner = wrapper.get(field).and_then(|value| value.as_str()).ok_or_else(|| {
                use serde::de::Error;
                AttemptError::Decode(serde_json::Error::custom(format!(
                    "proxy envelope missing string field `{field}`"
                )))
            })?;
            Ok(serde_json::from_str(inner)?)
        }
    }
}
