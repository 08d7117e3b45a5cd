//! Stats fetch and the widget that shows it
//!
//! The widget asks its [`StatsApi`] for repository metadata and then for the
//! open issue list. Only when both succeed are the counts shown; any failure
//! along the way is logged and every counter animates to zero instead.

use crate::config::{CounterSettings, SiteConfig};
use crate::counter::Animations;
use crate::display::{StatField, StatsDisplay};
use crate::error::{Result, SiteError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Repository counters shown by the stats widget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoStats {
    pub stars: u64,
    pub forks: u64,
    pub issues: u64,
}

impl RepoStats {
    #[must_use]
    pub fn get(&self, which: StatField) -> u64 {
        match which {
            StatField::Stars => self.stars,
            StatField::Forks => self.forks,
            StatField::Issues => self.issues,
        }
    }
}

/// Outcome of the stats workflow
///
/// Either every counter was fetched or none was; a failed second request
/// discards what the first one returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsResult {
    Fetched(RepoStats),
    Unavailable,
}

impl StatsResult {
    /// Counters to display; all zero when the fetch failed.
    #[must_use]
    pub fn counts(&self) -> RepoStats {
        match self {
            StatsResult::Fetched(stats) => *stats,
            StatsResult::Unavailable => RepoStats::default(),
        }
    }

    #[must_use]
    pub fn is_fetched(&self) -> bool {
        matches!(self, StatsResult::Fetched(_))
    }
}

/// Source of repository statistics
///
/// Both calls return the decoded JSON body of a successful response; any
/// transport failure or non-success status is an error.
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// Repository metadata, expected to carry `stargazers_count` and `forks_count`
    async fn repository(&self) -> Result<Value>;

    /// The list of open issues
    async fn open_issues(&self) -> Result<Value>;
}

/// Read a counter out of an untrusted JSON value.
///
/// Numbers are floored; numeric strings are accepted; negative, missing or
/// non-numeric values count as zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn coerce_count(value: Option<&Value>) -> u64 {
    let number = match value {
        Some(Value::Number(n)) => {
            if let Some(unsigned) = n.as_u64() {
                return unsigned;
            }
            n.as_f64()
        }
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() && n >= 1.0 => n.floor() as u64,
        _ => 0,
    }
}

/// Number of entries in an issue list; anything other than an array is zero.
#[must_use]
pub fn count_issues(value: &Value) -> u64 {
    value
        .as_array()
        .map_or(0, |issues| u64::try_from(issues.len()).unwrap_or(u64::MAX))
}

/// Run both requests in order and extract the counters.
///
/// The issue list is only requested once the metadata request succeeded.
///
/// # Arguments
///
/// * `api` - Source of the repository metadata and the open issue list
///
/// # Errors
///
/// Returns the first error reported by `api`
pub async fn try_fetch_stats<A>(api: &A) -> Result<RepoStats>
where
    A: StatsApi + ?Sized,
{
    let metadata = api.repository().await?;
    let stars = coerce_count(metadata.get("stargazers_count"));
    let forks = coerce_count(metadata.get("forks_count"));
    debug!("Repository metadata received: stars={stars}, forks={forks}");

    let issue_list = api.open_issues().await?;
    let issues = count_issues(&issue_list);
    debug!("Open issue list received: issues={issues}");

    Ok(RepoStats {
        stars,
        forks,
        issues,
    })
}

/// Fetch the repository statistics, falling back to zeros on any failure.
///
/// Failures are only logged; the caller sees [`StatsResult::Unavailable`].
///
/// # Arguments
///
/// * `api` - Source of the repository metadata and the open issue list
/// * `deadline` - Upper bound on both requests together
///
/// # Returns
///
/// [`StatsResult::Fetched`] if both requests succeeded in time, otherwise
/// [`StatsResult::Unavailable`]
pub async fn fetch_stats<A>(api: &A, deadline: Duration) -> StatsResult
where
    A: StatsApi + ?Sized,
{
    let outcome = match tokio::time::timeout(deadline, try_fetch_stats(api)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(SiteError::Timeout(deadline)),
    };

    match outcome {
        Ok(stats) => {
            info!(
                "Repository stats fetched: stars={}, forks={}, issues={}",
                stats.stars, stats.forks, stats.issues
            );
            StatsResult::Fetched(stats)
        }
        Err(e) => {
            error!("GitHub API fetch failed: {e}");
            StatsResult::Unavailable
        }
    }
}

/// Handle to the spawned fetch; aborts the task when dropped
struct FetchTask(JoinHandle<StatsResult>);

impl Drop for FetchTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// The stats widget: fetch the counters, then count each display field up to its value
pub struct StatsWidget {
    api: Arc<dyn StatsApi>,
    display: StatsDisplay,
    counter: CounterSettings,
    deadline: Duration,
}

impl StatsWidget {
    pub fn new(api: Arc<dyn StatsApi>, display: StatsDisplay, config: &SiteConfig) -> Self {
        Self {
            api,
            display,
            counter: config.counter,
            deadline: config.request_timeout(),
        }
    }

    /// Run the workflow once and start the three counter animations.
    ///
    /// The fetch runs on its own task so that a panicking [`StatsApi`]
    /// implementation ends in the zero fallback like any other failure.
    ///
    /// Dropping the returned future before it completes aborts the fetch, so
    /// no further requests are issued once the caller has given up.
    ///
    /// # Returns
    ///
    /// The outcome the counters were started with
    pub async fn run(&self, animations: &Animations) -> StatsResult {
        let api = Arc::clone(&self.api);
        let deadline = self.deadline;
        let mut fetch = FetchTask(tokio::spawn(async move {
            fetch_stats(api.as_ref(), deadline).await
        }));

        let result = match (&mut fetch.0).await {
            Ok(result) => result,
            Err(e) => {
                error!("GitHub API fetch task aborted: {e}");
                StatsResult::Unavailable
            }
        };

        let counts = result.counts();
        for which in StatField::ALL {
            animations.start(self.display.field(which), counts.get(which), &self.counter);
        }

        result
    }
}
