//! # Aelyx Site Preview
//!
//! Headless preview of the landing page behaviour. It lays out a page with a
//! hero section, a features section and a screenshot gallery, loads it,
//! scrolls to the bottom, and logs every page event along with the final
//! values of the stats counters.
//!
//! ```bash
//! # Use site.json5 from the working directory if present, else the defaults
//! cargo run
//!
//! # Use a JSON5 configuration file
//! cargo run site.json5
//! ```
//!
//! Log levels can be controlled through the `RUST_LOG` environment variable.

use aelyx_site::config::{SiteConfig, CONFIG_FILE};
use aelyx_site::display::{StatsDisplay, TextField};
use aelyx_site::error::SiteError;
use aelyx_site::github::GitHubClient;
use aelyx_site::layout::{Rect, Viewport};
use aelyx_site::observer::Section;
use aelyx_site::page::LandingPage;
use aelyx_site::stats::StatsWidget;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const PAGE_WIDTH: f64 = 1280.0;
const VIEWPORT_HEIGHT: f64 = 800.0;

#[tokio::main]
async fn main() -> Result<(), SiteError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = env::args().nth(1).map(PathBuf::from).or_else(|| {
        let default_path = PathBuf::from(CONFIG_FILE);
        default_path.exists().then_some(default_path)
    });
    let config = match config_path {
        Some(path) => SiteConfig::load(&path)?,
        None => SiteConfig::default(),
    };
    config.validate()?;

    tracing::info!("Previewing stats for {}", config.repository);

    let stars = TextField::new();
    let forks = TextField::new();
    let issues = TextField::new();
    let display = StatsDisplay::new(
        Arc::new(stars.clone()),
        Arc::new(forks.clone()),
        Arc::new(issues.clone()),
    );
    let api = Arc::new(GitHubClient::new(&config)?);
    let widget = StatsWidget::new(api, display, &config);

    let mut page = LandingPage::new(&config, widget);
    let _events = page
        .events()
        .subscribe(|event| tracing::info!("Page event: {event:?}"));

    page.add_section(
        Section::new("home", Rect::new(0.0, 0.0, PAGE_WIDTH, 720.0)).with_class("hero"),
    );
    page.add_section(Section::new("features", Rect::new(0.0, 720.0, PAGE_WIDTH, 900.0)));
    page.add_section(Section::new("screenshots", Rect::new(0.0, 1620.0, PAGE_WIDTH, 800.0)));
    for (i, top) in [780.0, 780.0, 1100.0, 1100.0].into_iter().enumerate() {
        page.add_reveal_item(
            format!("feature-card-{}", i + 1),
            Rect::new(0.0, top, PAGE_WIDTH / 2.0, 280.0),
        );
    }
    page.add_reveal_item("screenshot-item-1", Rect::new(0.0, 1700.0, PAGE_WIDTH, 600.0));

    let viewport = Viewport::new(PAGE_WIDTH, VIEWPORT_HEIGHT);
    page.load(&viewport);
    for scroll_y in [400.0, 900.0, 1620.0] {
        page.scroll(&viewport.scrolled_to(scroll_y));
    }

    let interrupted = tokio::select! {
        result = page.settle() => {
            tracing::info!("Stats workflow finished: {result:?}");
            false
        }
        _ = tokio::signal::ctrl_c() => true,
    };

    if interrupted {
        tracing::info!("Interrupted; tearing the page down");
        page.teardown();
    }

    tracing::info!(
        "Displayed stats: stars={}, forks={}, issues={}",
        stars.text(),
        forks.text(),
        issues.text()
    );
    Ok(())
}
