//! GitHub REST client for the stats widget.

use crate::config::SiteConfig;
use crate::error::{Result, SiteError};
use crate::stats::StatsApi;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;
use url::Url;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// [`StatsApi`] backed by the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    repository_url: Url,
    issues_url: Url,
}

impl GitHubClient {
    /// Build a client for the repository named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_base` is not a valid URL or the HTTP client
    /// cannot be constructed
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let base = Url::parse(&config.api_base)
            .map_err(|e| SiteError::from(format!("Invalid API base URL: {e}")))?;

        let repository = &config.repository;
        let repository_url = endpoint(
            &base,
            &["repos", repository.owner.as_str(), repository.name.as_str()],
        )?;
        let mut issues_url = endpoint(&repository_url, &["issues"])?;
        issues_url.query_pairs_mut().append_pair("state", "open");

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            repository_url,
            issues_url,
        })
    }

    #[must_use]
    pub fn repository_url(&self) -> &Url {
        &self.repository_url
    }

    #[must_use]
    pub fn issues_url(&self) -> &Url {
        &self.issues_url
    }

    async fn get_json(&self, url: &Url) -> Result<Value> {
        debug!("Requesting {url}");
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::Status {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Append `segments` to the path of `base`, percent-escaping each one.
///
/// # Errors
///
/// Returns an error if `base` cannot carry a path (such as a `mailto:` URL)
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| SiteError::from(format!("API base URL cannot carry a path: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl StatsApi for GitHubClient {
    async fn repository(&self) -> Result<Value> {
        self.get_json(&self.repository_url).await
    }

    async fn open_issues(&self) -> Result<Value> {
        self.get_json(&self.issues_url).await
    }
}
