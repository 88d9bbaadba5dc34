// src/fetch/github.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};
use url::Url;

use crate::series::{self, SeriesRow};

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

/// Client for the private GitHub repository holding the dataset exports.
///
/// Datasets are plain JSON files fetched through the contents API with the
/// raw media type, so the response body is the file itself.
pub struct DataRepoClient {
    client: Client,
    repo: String,
    prefix: String,
    token: String,
}

impl DataRepoClient {
    /// `repo` is `owner/name`; `prefix` is the directory inside the repo
    /// that holds the current exports.
    pub fn new(repo: &str, prefix: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("building HTTP client")?;

        Ok(DataRepoClient {
            client,
            repo: repo.to_string(),
            prefix: prefix.trim_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn contents_url(&self, dataset: &str) -> Result<Url> {
        Url::parse(&format!(
            "https://api.github.com/repos/{}/contents/{}/{}.json",
            self.repo, self.prefix, dataset
        ))
        .with_context(|| format!("invalid contents URL for dataset `{dataset}`"))
    }

    async fn get_raw(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching dataset");
        Ok(self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github.v3.raw")
            .header("Authorization", format!("token {}", self.token))
            // The GitHub API rejects requests without a user agent.
            .header("User-Agent", "acsplot")
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?
            .error_for_status()
            .with_context(|| format!("non-success status from {url}"))?
            .text()
            .await
            .with_context(|| format!("reading body from {url}"))?)
    }

    async fn get_raw_with_retry(&self, url: &Url) -> Result<String> {
        let mut attempts = 0;
        loop {
            match self.get_raw(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempts < MAX_RETRIES => {
                    attempts += 1;
                    let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempts - 1);
                    warn!(%url, attempt = attempts, delay_ms = backoff, error = %e, "retrying");
                    sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => {
                    error!(%url, error = %e, "exhausted retries");
                    return Err(e);
                }
            }
        }
    }

    /// Fetch one dataset and keep only rows that carry a population
    /// estimate. Partially-released periods without one chart as gaps
    /// everywhere and are dropped at the door.
    pub async fn fetch_rows(&self, dataset: &str) -> Result<Vec<SeriesRow>> {
        let url = self.contents_url(dataset)?;
        let body = self.get_raw_with_retry(&url).await?;

        let mut rows = series::parse_rows(&body)
            .with_context(|| format!("parsing dataset `{dataset}`"))?;

        let before = rows.len();
        rows.retain(|row| row.value("population__total").is_some());
        debug!(
            dataset,
            kept = rows.len(),
            dropped = before - rows.len(),
            "loaded dataset"
        );

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contents_url_targets_the_raw_contents_api() {
        let client =
            DataRepoClient::new("shi-institute/interactive-web-private-data", "northside-24", "t")
                .unwrap();
        let url = client.contents_url("neighborhoods_data_series").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/shi-institute/interactive-web-private-data/contents/northside-24/neighborhoods_data_series.json"
        );
    }

    #[test]
    fn prefix_slashes_are_normalized() {
        let client = DataRepoClient::new("owner/data", "/exports/", "t").unwrap();
        let url = client.contents_url("tracts").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/owner/data/contents/exports/tracts.json"
        );
    }
}
