//! # Aelyx Site Library
//!
//! Client-side behaviour of the Aelyx landing page, written against injected
//! display fields and page geometry instead of a concrete browser. A host (a
//! browser binding, a headless renderer, or the bundled preview binary) lays
//! out sections, forwards load and scroll events, and renders whatever the
//! page reports back.
//!
//! ## Overview
//!
//! - `observer`: detects sections entering the viewport and reveals them once
//! - `stats`: fetches repository stars, forks and open issues, all or nothing
//! - `counter`: count-up animations for the stats fields
//! - `page`: wires the pieces together and publishes [`page::PageEvent`]s
//!
//! ## Getting Started
//!
//! ```no_run
//! use aelyx_site::config::SiteConfig;
//! use aelyx_site::display::{StatsDisplay, TextField};
//! use aelyx_site::github::GitHubClient;
//! use aelyx_site::layout::{Rect, Viewport};
//! use aelyx_site::observer::Section;
//! use aelyx_site::page::LandingPage;
//! use aelyx_site::stats::StatsWidget;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), aelyx_site::error::SiteError> {
//!     let config = SiteConfig::default();
//!     let stars = TextField::new();
//!     let display = StatsDisplay::new(
//!         Arc::new(stars.clone()),
//!         Arc::new(TextField::new()),
//!         Arc::new(TextField::new()),
//!     );
//!     let widget = StatsWidget::new(Arc::new(GitHubClient::new(&config)?), display, &config);
//!
//!     let mut page = LandingPage::new(&config, widget);
//!     page.add_section(Section::new("hero", Rect::new(0.0, 0.0, 1280.0, 720.0)));
//!     page.load(&Viewport::new(1280.0, 800.0));
//!     page.settle().await;
//!
//!     println!("stars: {}", stars.text());
//!     Ok(())
//! }
//! ```

/// Custom error types module
///
/// Defines the `SiteError` enum shared by the stats client and the
/// configuration loader.
pub mod error;

/// Configuration module
///
/// Runtime settings with defaults for every field, optionally loaded from a
/// JSON5 file.
pub mod config;

/// Page geometry: rectangles, viewport and intersection ratios
pub mod layout;

/// Display fields the widgets write into
pub mod display;

/// Count-up animations
///
/// Each animation runs on its own task and can be cancelled as part of a
/// group when the page is torn down.
pub mod counter;

/// Repository statistics workflow
///
/// Two sequential requests with an all-or-nothing result and a zero
/// fallback, plus the widget that animates the result into view.
pub mod stats;

/// GitHub REST client implementing the stats source
pub mod github;

/// Typed event dispatch with explicit subscriptions
pub mod events;

/// One-time section reveal driven by viewport intersection
pub mod observer;

/// Navbar scroll effect
pub mod navbar;

/// Scroll-triggered reveal of feature cards and screenshots
pub mod reveal;

/// Landing page wiring
///
/// Routes load and scroll events to the navbar, the scroll reveal and the
/// visibility observer, and starts the stats widget the first time the
/// stats section becomes visible.
pub mod page;
