// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Fetches the raw dataset from `dataset.url` and parses it into a
// Dataset.
//
// Order of checks:
//   1. `dataset.url` must be set       → MissingDatasetUrl otherwise,
//                                        before any network traffic
//   2. GET the URL                     → DatasetFetch on transport
//                                        failure or non-2xx status
//   3. Body must be [ {..}, {..}, .. ] → DatasetParse otherwise
//
// The HTTP call sits behind `BodyFetcher` so the loader can be
// exercised without a network. Transient failures (transport errors,
// 429, 5xx) are retried with exponential backoff, up to
// `dataset.max_retries` extra attempts.

use std::time::Duration;

use anyhow::{Context, Result};
use backon::{BlockingRetryable, ExponentialBuilder};
use reqwest::blocking::Client;

use crate::data::dataset::Dataset;
use crate::domain::error::PipelineError;
use crate::infra::config::Configuration;

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Anything that can produce the raw Dataset described by a Configuration.
pub trait DatasetSource {
    fn load(&self, config: &Configuration) -> Result<Dataset, PipelineError>;
}

// ─── BodyFetcher ──────────────────────────────────────────────────────────────
/// Performs one GET and returns the response body.
pub trait BodyFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, PipelineError>;
}

/// Blocking reqwest client
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

impl BodyFetcher for ReqwestFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String, PipelineError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|e| PipelineError::DatasetFetch {
                url:    url.to_string(),
                status: e.status().map(|s| s.as_u16()),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::DatasetFetch {
                url:    url.to_string(),
                status: Some(status.as_u16()),
                reason: format!("server responded with {status}"),
            });
        }

        response.text().map_err(|e| PipelineError::DatasetFetch {
            url:    url.to_string(),
            status: Some(status.as_u16()),
            reason: format!("cannot read response body: {e}"),
        })
    }
}

// ─── HttpDatasetLoader ────────────────────────────────────────────────────────
pub struct HttpDatasetLoader<F = ReqwestFetcher> {
    fetcher: F,
}

impl HttpDatasetLoader<ReqwestFetcher> {
    /// Loader backed by a real HTTP client
    pub fn with_default_client() -> Result<Self> {
        Ok(Self::new(ReqwestFetcher::new()?))
    }
}

impl<F: BodyFetcher> HttpDatasetLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    fn fetch_with_retry(&self, url: &str, config: &Configuration) -> Result<String, PipelineError> {
        let timeout = Duration::from_secs(config.dataset.timeout_secs);
        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(500))
            .with_max_times(config.dataset.max_retries);

        (|| self.fetcher.fetch(url, timeout))
            .retry(backoff)
            .sleep(std::thread::sleep)
            .when(is_transient)
            .notify(|err: &PipelineError, wait: Duration| {
                tracing::warn!("Dataset fetch failed ({err}), retrying in {wait:?}");
            })
            .call()
    }
}

impl<F: BodyFetcher> DatasetSource for HttpDatasetLoader<F> {
    fn load(&self, config: &Configuration) -> Result<Dataset, PipelineError> {
        let name = &config.dataset.name;
        tracing::info!("Loading dataset: {}", name);

        let url = config
            .dataset
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| PipelineError::MissingDatasetUrl(name.clone()))?;

        let body = self
            .fetch_with_retry(url, config)
            .inspect_err(|e| tracing::error!("Error loading dataset: {e}"))?;

        let dataset = Dataset::from_json_str(&body)
            .inspect_err(|e| tracing::error!("Error parsing dataset: {e}"))?;

        tracing::info!("Successfully loaded {} records from {}", dataset.len(), name);
        Ok(dataset)
    }
}

/// Transport failures, rate limiting and server errors are worth
/// another attempt; other client errors are not.
fn is_transient(err: &PipelineError) -> bool {
    match err.fetch_status() {
        None => matches!(err, PipelineError::DatasetFetch { .. }),
        Some(code) => code == 429 || code >= 500,
    }
}
