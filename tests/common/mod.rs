// Shared helpers for the integration tests

#![allow(dead_code)]

use aelyx_site::config::SiteConfig;
use aelyx_site::display::{StatsDisplay, TextField};
use aelyx_site::error::{Result, SiteError};
use aelyx_site::stats::{StatsApi, StatsWidget};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How a mocked endpoint answers
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    /// Answers with the JSON body after the given delay
    Delayed(Duration, Value),
    Status(u16),
    NetworkError,
    Hang,
    Panic,
}

/// In-memory stats source that counts how often each endpoint is hit
pub struct MockApi {
    repository: Reply,
    issues: Reply,
    pub repository_calls: AtomicUsize,
    pub issues_calls: AtomicUsize,
}

impl MockApi {
    pub fn new(repository: Reply, issues: Reply) -> Self {
        Self {
            repository,
            issues,
            repository_calls: AtomicUsize::new(0),
            issues_calls: AtomicUsize::new(0),
        }
    }

    /// `{stargazers_count: 42, forks_count: 7}` and three open issues
    pub fn healthy() -> Self {
        Self::new(
            Reply::Json(json!({"stargazers_count": 42, "forks_count": 7})),
            Reply::Json(json!([{"number": 1}, {"number": 2}, {"number": 3}])),
        )
    }

    pub fn repository_calls(&self) -> usize {
        self.repository_calls.load(Ordering::SeqCst)
    }

    pub fn issues_calls(&self) -> usize {
        self.issues_calls.load(Ordering::SeqCst)
    }

    async fn answer(reply: &Reply, endpoint: &str) -> Result<Value> {
        match reply {
            Reply::Json(value) => Ok(value.clone()),
            Reply::Delayed(delay, value) => {
                tokio::time::sleep(*delay).await;
                Ok(value.clone())
            }
            Reply::Status(status) => Err(SiteError::Status {
                endpoint: endpoint.to_string(),
                status: *status,
            }),
            Reply::NetworkError => Err(SiteError::from("network unreachable")),
            Reply::Hang => std::future::pending().await,
            Reply::Panic => panic!("stats source blew up"),
        }
    }
}

#[async_trait]
impl StatsApi for MockApi {
    async fn repository(&self) -> Result<Value> {
        self.repository_calls.fetch_add(1, Ordering::SeqCst);
        Self::answer(&self.repository, "/repos/xZepyx/HyprZepyx").await
    }

    async fn open_issues(&self) -> Result<Value> {
        self.issues_calls.fetch_add(1, Ordering::SeqCst);
        Self::answer(&self.issues, "/repos/xZepyx/HyprZepyx/issues").await
    }
}

/// The three display fields, kept readable by the test
pub struct Fields {
    pub stars: TextField,
    pub forks: TextField,
    pub issues: TextField,
}

impl Fields {
    pub fn new() -> Self {
        Self {
            stars: TextField::new(),
            forks: TextField::new(),
            issues: TextField::new(),
        }
    }

    pub fn display(&self) -> StatsDisplay {
        StatsDisplay::new(
            Arc::new(self.stars.clone()),
            Arc::new(self.forks.clone()),
            Arc::new(self.issues.clone()),
        )
    }

    pub fn values(&self) -> (String, String, String) {
        (self.stars.text(), self.forks.text(), self.issues.text())
    }
}

pub fn widget(api: &Arc<MockApi>, fields: &Fields, config: &SiteConfig) -> StatsWidget {
    let api: Arc<dyn StatsApi> = api.clone();
    StatsWidget::new(api, fields.display(), config)
}
