use crate::error::{Result, SiteError};
use crate::layout::RootMargin;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Conventional name of the configuration file read by the preview binary
pub const CONFIG_FILE: &str = "site.json5";
/// Statistics API used when none is configured
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_REPOSITORY_OWNER: &str = "xZepyx";
pub const DEFAULT_REPOSITORY_NAME: &str = "HyprZepyx";
/// Upper bound on the whole stats workflow, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Number of ticks a count-up animation takes to reach its target
pub const DEFAULT_COUNTER_STEPS: u32 = 100;
pub const DEFAULT_COUNTER_TICK_MS: u64 = 20;
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.1;
pub const DEFAULT_ROOT_MARGIN_BOTTOM: f64 = -50.0;
/// Section whose first reveal triggers the stats fetch
pub const DEFAULT_STATS_SECTION: &str = "hero";
pub const DEFAULT_NAVBAR_SCROLL_THRESHOLD: f64 = 100.0;
pub const DEFAULT_REVEAL_OFFSET: f64 = 150.0;

/// Runtime configuration for the landing page behaviour
///
/// Every field has a default, so a configuration file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Repository whose statistics are displayed
    pub repository: Repository,
    /// Base URL of the repository-hosting API
    pub api_base: String,
    /// Deadline for the stats workflow, in seconds
    pub request_timeout_secs: u64,
    /// Count-up animation settings
    pub counter: CounterSettings,
    /// Visibility observer settings
    pub observer: ObserverOptions,
    /// Id or class of the section that triggers the stats fetch
    pub stats_section: String,
    /// Scroll offset past which the navbar turns solid
    pub navbar_scroll_threshold: f64,
    /// Distance from the viewport bottom at which cards are revealed
    pub reveal_offset: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            repository: Repository::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            counter: CounterSettings::default(),
            observer: ObserverOptions::default(),
            stats_section: DEFAULT_STATS_SECTION.to_string(),
            navbar_scroll_threshold: DEFAULT_NAVBAR_SCROLL_THRESHOLD,
            reveal_offset: DEFAULT_REVEAL_OFFSET,
        }
    }
}

/// Owner and name of a hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Default for Repository {
    fn default() -> Self {
        Self {
            owner: DEFAULT_REPOSITORY_OWNER.to_string(),
            name: DEFAULT_REPOSITORY_NAME.to_string(),
        }
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Count-up animation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CounterSettings {
    /// Ticks needed to go from zero to the target
    pub steps: u32,
    /// Delay between ticks, in milliseconds
    pub tick_ms: u64,
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            steps: DEFAULT_COUNTER_STEPS,
            tick_ms: DEFAULT_COUNTER_TICK_MS,
        }
    }
}

impl CounterSettings {
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Visibility observer settings
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObserverOptions {
    /// Fraction of a section that must be on screen to count as visible
    pub threshold: f64,
    /// Adjustment to the viewport bounds used for the intersection test
    pub root_margin: RootMargin,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_VISIBILITY_THRESHOLD,
            root_margin: RootMargin {
                bottom: DEFAULT_ROOT_MARGIN_BOTTOM,
                ..RootMargin::default()
            },
        }
    }
}

impl SiteConfig {
    /// Load the configuration from a JSON5 file.
    ///
    /// Keys missing from the file keep their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON5
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!("Loading site configuration from {}", path.display());
        let config_str = fs::read_to_string(path)?;
        let config: SiteConfig = json5::from_str(&config_str)?;

        tracing::info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Check that the configuration can drive the page.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.repository.owner.trim().is_empty() {
            return Err(SiteError::from("Repository owner cannot be empty"));
        }
        if self.repository.name.trim().is_empty() {
            return Err(SiteError::from("Repository name cannot be empty"));
        }
        for segment in [&self.repository.owner, &self.repository.name] {
            if segment == "." || segment == ".." {
                return Err(SiteError::from(format!(
                    "Invalid repository path segment: {segment}"
                )));
            }
        }
        if Url::parse(&self.api_base).is_err() {
            return Err(SiteError::from(format!(
                "Invalid API base URL: {}",
                self.api_base
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(SiteError::from("Request timeout must be positive"));
        }
        if self.counter.steps == 0 {
            return Err(SiteError::from("Counter steps must be positive"));
        }
        if self.counter.tick_ms == 0 {
            return Err(SiteError::from("Counter tick must be positive"));
        }
        if !(0.0..=1.0).contains(&self.observer.threshold) {
            return Err(SiteError::from(
                "Visibility threshold must be between 0 and 1",
            ));
        }
        if self.stats_section.trim().is_empty() {
            return Err(SiteError::from("Stats section cannot be empty"));
        }

        Ok(())
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
