//! Page lifecycle and event routing
//!
//! [`LandingPage`] owns the per-page state and turns load, scroll and unload
//! notifications from the host into [`PageEvent`]s.

use crate::config::SiteConfig;
use crate::counter::Animations;
use crate::events::Dispatcher;
use crate::layout::{Rect, Viewport};
use crate::navbar::{Navbar, NavbarStyle};
use crate::observer::{Section, SectionId, VisibilityObserver};
use crate::reveal::ScrollReveal;
use crate::stats::{StatsResult, StatsWidget};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Something the page did that a host may want to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// The page finished loading
    Loaded,
    /// The navbar background changed
    NavbarChanged(NavbarStyle),
    /// A section became visible for the first time and gets its "visible" marker
    SectionRevealed(SectionId),
    /// A card was faded in by the scroll reveal
    ItemRevealed(String),
    /// The stats workflow finished and its counters are animating
    StatsSettled(StatsResult),
    /// The page was torn down
    Unloaded,
}

/// Landing page behaviour: navbar, reveals and the stats widget
///
/// Must be driven from within a tokio runtime, since revealing the stats
/// section spawns the fetch.
pub struct LandingPage {
    stats_section: String,
    observer: VisibilityObserver,
    navbar: Navbar,
    reveal: ScrollReveal,
    widget: Arc<StatsWidget>,
    animations: Arc<Animations>,
    events: Dispatcher<PageEvent>,
    stats_task: Option<JoinHandle<StatsResult>>,
    stats_requested: bool,
    loaded: bool,
    torn_down: bool,
}

impl LandingPage {
    /// Create a page that has not been loaded yet.
    ///
    /// # Arguments
    ///
    /// * `config` - Observer, navbar and reveal settings
    /// * `widget` - Stats widget started when the stats section is first revealed
    pub fn new(config: &SiteConfig, widget: StatsWidget) -> Self {
        Self {
            stats_section: config.stats_section.clone(),
            observer: VisibilityObserver::new(config.observer),
            navbar: Navbar::new(config.navbar_scroll_threshold),
            reveal: ScrollReveal::new(config.reveal_offset),
            widget: Arc::new(widget),
            animations: Arc::new(Animations::new()),
            events: Dispatcher::new(),
            stats_task: None,
            stats_requested: false,
            loaded: false,
            torn_down: false,
        }
    }

    /// Event stream of the page; subscribe to render changes.
    #[must_use]
    pub fn events(&self) -> &Dispatcher<PageEvent> {
        &self.events
    }

    pub fn add_section(&mut self, section: Section) {
        self.observer.observe(section);
    }

    /// Track a card for the scroll reveal.
    pub fn add_reveal_item(&mut self, id: impl Into<String>, bounds: Rect) {
        self.reveal.track(id, bounds);
    }

    #[must_use]
    pub fn is_revealed(&self, id: &SectionId) -> bool {
        self.observer.is_revealed(id)
    }

    #[must_use]
    pub fn navbar_style(&self) -> NavbarStyle {
        self.navbar.style()
    }

    #[must_use]
    pub fn reveal(&self) -> &ScrollReveal {
        &self.reveal
    }

    /// True once the stats fetch has been started.
    #[must_use]
    pub fn stats_requested(&self) -> bool {
        self.stats_requested
    }

    #[must_use]
    pub fn animations(&self) -> &Animations {
        &self.animations
    }

    /// Handle the page load and report sections already in view.
    pub fn load(&mut self, viewport: &Viewport) {
        if self.torn_down || self.loaded {
            return;
        }
        self.loaded = true;
        info!("Landing page loaded");
        self.events.emit(&PageEvent::Loaded);
        self.scroll(viewport);
    }

    /// Handle a scroll or resize to `viewport`.
    pub fn scroll(&mut self, viewport: &Viewport) {
        if self.torn_down {
            return;
        }

        if let Some(style) = self.navbar.on_scroll(viewport.scroll_y) {
            self.events.emit(&PageEvent::NavbarChanged(style));
        }

        for id in self.reveal.on_scroll(viewport) {
            self.events.emit(&PageEvent::ItemRevealed(id));
        }

        for entry in self.observer.check(viewport) {
            if !entry.first_reveal {
                continue;
            }

            let is_stats_section = self
                .observer
                .section(&entry.id)
                .is_some_and(|section| section.matches(&self.stats_section));
            if is_stats_section {
                self.start_stats();
            }

            self.events.emit(&PageEvent::SectionRevealed(entry.id));
        }
    }

    fn start_stats(&mut self) {
        if self.stats_requested {
            return;
        }
        self.stats_requested = true;
        debug!("Stats section revealed; fetching repository stats");

        let widget = Arc::clone(&self.widget);
        let animations = Arc::clone(&self.animations);
        let events = self.events.clone();
        self.stats_task = Some(tokio::spawn(async move {
            let result = widget.run(&animations).await;
            events.emit(&PageEvent::StatsSettled(result));
            result
        }));
    }

    /// Wait for the stats workflow, if it was started.
    pub async fn stats(&mut self) -> Option<StatsResult> {
        let task = self.stats_task.take()?;
        match task.await {
            Ok(result) => Some(result),
            Err(e) => {
                error!("Stats widget task failed: {e}");
                None
            }
        }
    }

    /// Wait for the stats workflow and every counter animation to finish.
    pub async fn settle(&mut self) -> Option<StatsResult> {
        let result = self.stats().await;
        self.animations.settle().await;
        result
    }

    /// Tear the page down.
    ///
    /// Aborts an unfinished stats fetch, so no further requests are issued,
    /// cancels pending animations and stops observing sections. Later events
    /// are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        if let Some(task) = self.stats_task.take() {
            task.abort();
        }
        self.animations.teardown();
        self.observer.disconnect();
        info!("Landing page torn down");
        self.events.emit(&PageEvent::Unloaded);
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl Drop for LandingPage {
    fn drop(&mut self) {
        self.teardown();
    }
}
