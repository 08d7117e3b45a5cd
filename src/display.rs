//! Display surfaces the stats widget writes into.
//!
//! The host hands these in explicitly; nothing in the crate looks up page
//! elements on its own.

use std::sync::{Arc, RwLock};
use tracing::error;

/// A field that shows a short piece of text, such as a counter value
pub trait DisplayField: Send + Sync {
    fn set_text(&self, text: &str);
}

#[derive(Debug, Default)]
struct FieldState {
    text: String,
    writes: usize,
}

/// In-memory display field
///
/// Clones share the same underlying state, so a host can keep one handle for
/// reading while the animation writes through another.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    state: Arc<RwLock<FieldState>>,
}

impl TextField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text, or an empty string if the field was never written.
    #[must_use]
    pub fn text(&self) -> String {
        match self.state.read() {
            Ok(guard) => guard.text.clone(),
            Err(e) => {
                error!("Failed to acquire display field read lock: {e}");
                String::new()
            }
        }
    }

    /// Number of times the field has been written.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.state.read().map(|guard| guard.writes).unwrap_or_default()
    }
}

impl DisplayField for TextField {
    fn set_text(&self, text: &str) {
        match self.state.write() {
            Ok(mut guard) => {
                guard.text.clear();
                guard.text.push_str(text);
                guard.writes += 1;
            }
            Err(e) => error!("Failed to acquire display field write lock: {e}"),
        }
    }
}

/// Which of the three statistics a field shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    Stars,
    Forks,
    Issues,
}

impl StatField {
    pub const ALL: [StatField; 3] = [StatField::Stars, StatField::Forks, StatField::Issues];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StatField::Stars => "stars",
            StatField::Forks => "forks",
            StatField::Issues => "issues",
        }
    }
}

/// The three numeric fields of the stats widget
#[derive(Clone)]
pub struct StatsDisplay {
    pub stars: Arc<dyn DisplayField>,
    pub forks: Arc<dyn DisplayField>,
    pub issues: Arc<dyn DisplayField>,
}

impl StatsDisplay {
    pub fn new(
        stars: Arc<dyn DisplayField>,
        forks: Arc<dyn DisplayField>,
        issues: Arc<dyn DisplayField>,
    ) -> Self {
        Self {
            stars,
            forks,
            issues,
        }
    }

    #[must_use]
    pub fn field(&self, which: StatField) -> Arc<dyn DisplayField> {
        match which {
            StatField::Stars => Arc::clone(&self.stars),
            StatField::Forks => Arc::clone(&self.forks),
            StatField::Issues => Arc::clone(&self.issues),
        }
    }
}
