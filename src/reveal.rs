//! Scroll reveal for feature cards and screenshots
//!
//! Cards start hidden and fade in for good once their top edge has scrolled
//! a fixed offset above the bottom of the viewport.

use crate::layout::{Rect, Viewport};
use tracing::debug;

/// Inline style of a card before and after it is revealed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealStyle {
    pub opacity: f64,
    pub translate_y: f64,
}

impl RevealStyle {
    pub const HIDDEN: RevealStyle = RevealStyle {
        opacity: 0.0,
        translate_y: 30.0,
    };
    pub const SHOWN: RevealStyle = RevealStyle {
        opacity: 1.0,
        translate_y: 0.0,
    };
}

#[derive(Debug)]
struct Item {
    id: String,
    bounds: Rect,
    revealed: bool,
}

/// Fades cards in once they scroll far enough into the viewport
///
/// A card is revealed when its top edge is more than `offset` pixels above
/// the bottom of the viewport. Revealed cards stay revealed.
#[derive(Debug)]
pub struct ScrollReveal {
    offset: f64,
    items: Vec<Item>,
}

impl ScrollReveal {
    #[must_use]
    pub fn new(offset: f64) -> Self {
        Self {
            offset,
            items: Vec::new(),
        }
    }

    /// Track a card; it starts out in [`RevealStyle::HIDDEN`].
    pub fn track(&mut self, id: impl Into<String>, bounds: Rect) {
        let id = id.into();
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => item.bounds = bounds,
            None => self.items.push(Item {
                id,
                bounds,
                revealed: false,
            }),
        }
    }

    #[must_use]
    pub fn style(&self, id: &str) -> Option<RevealStyle> {
        self.items.iter().find(|item| item.id == id).map(|item| {
            if item.revealed {
                RevealStyle::SHOWN
            } else {
                RevealStyle::HIDDEN
            }
        })
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.items.iter().filter(|item| !item.revealed).count()
    }

    /// Reveal every card that has come into range; returns the newly revealed ids.
    pub fn on_scroll(&mut self, viewport: &Viewport) -> Vec<String> {
        let limit = viewport.height - self.offset;
        let mut revealed = Vec::new();

        for item in self.items.iter_mut().filter(|item| !item.revealed) {
            if viewport.relative_top(&item.bounds) < limit {
                item.revealed = true;
                debug!("Revealing {}", item.id);
                revealed.push(item.id.clone());
            }
        }

        revealed
    }
}
