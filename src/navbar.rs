//! Navbar background that darkens once the page is scrolled.

/// Navbar background once the page has scrolled past the threshold
pub const SOLID_BACKGROUND: &str = "rgba(10, 10, 10, 0.95)";
/// Navbar background near the top of the page
pub const TRANSLUCENT_BACKGROUND: &str = "rgba(10, 10, 10, 0.9)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarStyle {
    Translucent,
    Solid,
}

impl NavbarStyle {
    #[must_use]
    pub fn background(self) -> &'static str {
        match self {
            NavbarStyle::Translucent => TRANSLUCENT_BACKGROUND,
            NavbarStyle::Solid => SOLID_BACKGROUND,
        }
    }
}

/// Scroll-dependent navbar styling
#[derive(Debug)]
pub struct Navbar {
    threshold: f64,
    style: NavbarStyle,
}

impl Navbar {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            style: NavbarStyle::Translucent,
        }
    }

    #[must_use]
    pub fn style(&self) -> NavbarStyle {
        self.style
    }

    /// Update the style for a new scroll offset; returns the style if it changed.
    pub fn on_scroll(&mut self, scroll_y: f64) -> Option<NavbarStyle> {
        let style = if scroll_y > self.threshold {
            NavbarStyle::Solid
        } else {
            NavbarStyle::Translucent
        };

        if style == self.style {
            return None;
        }
        self.style = style;
        Some(style)
    }
}
