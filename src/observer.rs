//! Visibility observer for page sections
//!
//! Sections are checked against the viewport, adjusted by the configured
//! root margin, on every scroll. A section counts as visible once the share
//! of it inside that area reaches the threshold.

use crate::config::ObserverOptions;
use crate::layout::{intersection_ratio, Rect, Viewport};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Identity of a page section
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionId(String);

impl SectionId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A region of the page watched for visibility
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub classes: Vec<String>,
    pub bounds: Rect,
}

impl Section {
    pub fn new(id: impl Into<SectionId>, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            classes: Vec::new(),
            bounds,
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// True if `name` is this section's id or one of its classes.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.id.as_str() == name || self.has_class(name)
    }
}

/// A section crossing into view
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub id: SectionId,
    /// Fraction of the section inside the adjusted viewport
    pub ratio: f64,
    /// Set only the first time this section has ever become visible
    pub first_reveal: bool,
}

#[derive(Debug)]
struct Watched {
    section: Section,
    visible: bool,
    revealed: bool,
}

/// Edge-triggered visibility tracker for page sections
///
/// Reports a section each time it goes from hidden to visible and keeps a
/// sticky "revealed" flag that is set on the first such transition and
/// never cleared.
#[derive(Debug)]
pub struct VisibilityObserver {
    options: ObserverOptions,
    watched: Vec<Watched>,
}

impl VisibilityObserver {
    #[must_use]
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            watched: Vec::new(),
        }
    }

    /// Start watching `section`.
    ///
    /// Observing a section that is already watched replaces its geometry but
    /// keeps its revealed flag.
    pub fn observe(&mut self, section: Section) {
        if let Some(existing) = self.find_mut(&section.id) {
            existing.section = section;
            return;
        }

        debug!("Observing section {}", section.id);
        self.watched.push(Watched {
            section,
            visible: false,
            revealed: false,
        });
    }

    /// Stop watching a section. Returns false if it was not watched.
    pub fn unobserve(&mut self, id: &SectionId) -> bool {
        let before = self.watched.len();
        self.watched.retain(|w| &w.section.id != id);
        before != self.watched.len()
    }

    /// Stop watching every section.
    pub fn disconnect(&mut self) {
        self.watched.clear();
    }

    /// Move a watched section after a layout change.
    pub fn update_bounds(&mut self, id: &SectionId, bounds: Rect) -> bool {
        match self.find_mut(id) {
            Some(watched) => {
                watched.section.bounds = bounds;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.watched
            .iter()
            .find(|w| &w.section.id == id)
            .map(|w| &w.section)
    }

    #[must_use]
    pub fn is_revealed(&self, id: &SectionId) -> bool {
        self.watched
            .iter()
            .any(|w| &w.section.id == id && w.revealed)
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.watched.iter().filter(|w| w.revealed).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.watched.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }

    /// Run an intersection pass against `viewport`.
    ///
    /// # Arguments
    ///
    /// * `viewport` - Current window onto the document
    ///
    /// # Returns
    ///
    /// One entry per section that became visible since the previous pass, in
    /// the order the sections were observed
    pub fn check(&mut self, viewport: &Viewport) -> Vec<Intersection> {
        let root = viewport.bounds().expand(&self.options.root_margin);
        let threshold = self.options.threshold;
        let mut entries = Vec::new();

        for watched in &mut self.watched {
            let ratio = intersection_ratio(&watched.section.bounds, &root);
            let visible = ratio.is_some_and(|r| threshold <= 0.0 || r >= threshold);

            if visible && !watched.visible {
                let first_reveal = !watched.revealed;
                watched.revealed = true;
                debug!(
                    "Section {} entered view (first_reveal={first_reveal})",
                    watched.section.id
                );
                entries.push(Intersection {
                    id: watched.section.id.clone(),
                    ratio: ratio.unwrap_or_default(),
                    first_reveal,
                });
            }
            watched.visible = visible;
        }

        entries
    }

    fn find_mut(&mut self, id: &SectionId) -> Option<&mut Watched> {
        self.watched.iter_mut().find(|w| &w.section.id == id)
    }
}
