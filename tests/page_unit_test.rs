mod common;

use aelyx_site::config::SiteConfig;
use aelyx_site::layout::{Rect, Viewport};
use aelyx_site::navbar::NavbarStyle;
use aelyx_site::observer::{Section, SectionId};
use aelyx_site::page::{LandingPage, PageEvent};
use aelyx_site::reveal::RevealStyle;
use aelyx_site::stats::{RepoStats, StatsResult};
use common::{widget, Fields, MockApi, Reply};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const VIEWPORT: Viewport = Viewport::new(1280.0, 800.0);

// Hero at the top, features below the fold, a screenshots section further down.
fn build_page(api: &Arc<MockApi>, fields: &Fields) -> LandingPage {
    let config = SiteConfig::default();
    let mut page = LandingPage::new(&config, widget(api, fields, &config));
    page.add_section(
        Section::new("home", Rect::new(0.0, 0.0, 1280.0, 720.0)).with_class("hero"),
    );
    page.add_section(Section::new("features", Rect::new(0.0, 1000.0, 1280.0, 900.0)));
    page.add_section(Section::new("screenshots", Rect::new(0.0, 2000.0, 1280.0, 800.0)));
    page.add_reveal_item("feature-card-1", Rect::new(0.0, 1050.0, 600.0, 300.0));
    page
}

fn record(page: &LandingPage) -> (Arc<Mutex<Vec<PageEvent>>>, aelyx_site::events::Subscription) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let subscription = page.events().subscribe(move |event| {
        sink.lock().unwrap().push(event.clone());
    });
    (events, subscription)
}

#[tokio::test(start_paused = true)]
async fn test_hero_visible_on_load_fetches_and_animates() {
    let api = Arc::new(MockApi::healthy());
    let fields = Fields::new();
    let mut page = build_page(&api, &fields);
    let (events, _subscription) = record(&page);

    page.load(&VIEWPORT);
    assert!(page.stats_requested());
    assert!(page.is_revealed(&SectionId::from("home")));
    assert!(!page.is_revealed(&SectionId::from("features")));

    let result = page.settle().await;
    assert_eq!(
        result,
        Some(StatsResult::Fetched(RepoStats {
            stars: 42,
            forks: 7,
            issues: 3,
        }))
    );
    assert_eq!(
        fields.values(),
        ("42".to_string(), "7".to_string(), "3".to_string())
    );

    let events = events.lock().unwrap();
    assert_eq!(events[0], PageEvent::Loaded);
    assert!(events.contains(&PageEvent::SectionRevealed(SectionId::from("home"))));
    assert!(events.contains(&PageEvent::StatsSettled(StatsResult::Fetched(RepoStats {
        stars: 42,
        forks: 7,
        issues: 3,
    }))));
}

#[tokio::test(start_paused = true)]
async fn test_stats_fetched_once_across_repeated_visibility() {
    let api = Arc::new(MockApi::healthy());
    let fields = Fields::new();
    let mut page = build_page(&api, &fields);
    let (events, _subscription) = record(&page);

    page.load(&VIEWPORT);
    for _ in 0..5 {
        page.scroll(&VIEWPORT.scrolled_to(1200.0));
        page.scroll(&VIEWPORT.scrolled_to(2500.0));
        page.scroll(&VIEWPORT);
    }
    page.settle().await;

    assert_eq!(api.repository_calls(), 1);
    assert_eq!(api.issues_calls(), 1);

    let events = events.lock().unwrap();
    for id in ["home", "features", "screenshots"] {
        let reveals = events
            .iter()
            .filter(|event| **event == PageEvent::SectionRevealed(SectionId::from(id)))
            .count();
        assert_eq!(reveals, 1, "section {id} revealed {reveals} times");
    }
}

#[tokio::test(start_paused = true)]
async fn test_stats_wait_until_stats_section_is_visible() {
    let api = Arc::new(MockApi::healthy());
    let fields = Fields::new();
    let config = SiteConfig::default();
    let mut page = LandingPage::new(&config, widget(&api, &fields, &config));
    page.add_section(Section::new("intro", Rect::new(0.0, 0.0, 1280.0, 800.0)));
    page.add_section(
        Section::new("stats", Rect::new(0.0, 1600.0, 1280.0, 400.0)).with_class("hero"),
    );

    page.load(&VIEWPORT);
    assert!(!page.stats_requested());
    assert_eq!(page.stats().await, None);
    assert_eq!(api.repository_calls(), 0);
    assert_eq!(fields.stars.writes(), 0);

    page.scroll(&VIEWPORT.scrolled_to(1400.0));
    assert!(page.stats_requested());
    page.settle().await;
    assert_eq!(fields.stars.text(), "42");
}

#[tokio::test(start_paused = true)]
async fn test_failed_fetch_still_animates_zeros() {
    let api = Arc::new(MockApi::new(
        Reply::Json(json!({"stargazers_count": 42, "forks_count": 7})),
        Reply::Status(404),
    ));
    let fields = Fields::new();
    let mut page = build_page(&api, &fields);

    page.load(&VIEWPORT);
    assert_eq!(page.settle().await, Some(StatsResult::Unavailable));
    assert_eq!(
        fields.values(),
        ("0".to_string(), "0".to_string(), "0".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_navbar_and_cards_follow_scroll() {
    let api = Arc::new(MockApi::healthy());
    let fields = Fields::new();
    let mut page = build_page(&api, &fields);
    let (events, _subscription) = record(&page);

    page.load(&VIEWPORT);
    assert_eq!(page.navbar_style(), NavbarStyle::Translucent);
    assert_eq!(page.reveal().style("feature-card-1"), Some(RevealStyle::HIDDEN));

    page.scroll(&VIEWPORT.scrolled_to(600.0));
    assert_eq!(page.navbar_style(), NavbarStyle::Solid);
    assert_eq!(page.reveal().style("feature-card-1"), Some(RevealStyle::SHOWN));

    page.scroll(&VIEWPORT);
    assert_eq!(page.navbar_style(), NavbarStyle::Translucent);

    let events = events.lock().unwrap();
    assert!(events.contains(&PageEvent::NavbarChanged(NavbarStyle::Solid)));
    assert!(events.contains(&PageEvent::NavbarChanged(NavbarStyle::Translucent)));
    assert!(events.contains(&PageEvent::ItemRevealed("feature-card-1".to_string())));
}

#[tokio::test(start_paused = true)]
async fn test_teardown_stops_counters_mid_animation() {
    let api = Arc::new(MockApi::new(
        Reply::Json(json!({"stargazers_count": 5000, "forks_count": 5000})),
        Reply::Json(json!([])),
    ));
    let fields = Fields::new();
    let mut page = build_page(&api, &fields);
    let (events, _subscription) = record(&page);

    page.load(&VIEWPORT);
    tokio::time::sleep(Duration::from_millis(500)).await;
    page.teardown();

    let writes = fields.stars.writes();
    tokio::time::sleep(Duration::from_secs(5)).await;
    page.animations().settle().await;

    assert!(page.is_torn_down());
    assert_eq!(fields.stars.writes(), writes);
    assert_ne!(fields.stars.text(), "5000");
    assert_eq!(events.lock().unwrap().last(), Some(&PageEvent::Unloaded));

    // Events after teardown are ignored.
    page.scroll(&VIEWPORT.scrolled_to(2500.0));
    assert!(!page.is_revealed(&SectionId::from("screenshots")));
}

#[tokio::test(start_paused = true)]
async fn test_teardown_mid_fetch_issues_no_further_requests() {
    let api = Arc::new(MockApi::new(
        Reply::Delayed(
            Duration::from_secs(1),
            json!({"stargazers_count": 42, "forks_count": 7}),
        ),
        Reply::Json(json!([{}, {}, {}])),
    ));
    let fields = Fields::new();
    let mut page = build_page(&api, &fields);
    let (events, _subscription) = record(&page);

    page.load(&VIEWPORT);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(api.repository_calls(), 1);
    page.teardown();

    tokio::time::sleep(Duration::from_secs(3)).await;
    page.animations().settle().await;

    assert_eq!(api.repository_calls(), 1);
    assert_eq!(api.issues_calls(), 0);
    assert_eq!(fields.stars.writes(), 0);
    assert_eq!(page.stats().await, None);

    let events = events.lock().unwrap();
    assert!(!events
        .iter()
        .any(|event| matches!(event, PageEvent::StatsSettled(_))));
    assert_eq!(events.last(), Some(&PageEvent::Unloaded));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_subscription_stops_delivery() {
    let api = Arc::new(MockApi::healthy());
    let fields = Fields::new();
    let mut page = build_page(&api, &fields);
    let (events, subscription) = record(&page);

    page.load(&VIEWPORT);
    let seen = events.lock().unwrap().len();
    drop(subscription);

    page.scroll(&VIEWPORT.scrolled_to(2500.0));
    page.settle().await;
    assert_eq!(events.lock().unwrap().len(), seen);
}
