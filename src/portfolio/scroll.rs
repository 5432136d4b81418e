// Scroll-driven navigation
//
// - ScrollSpy: which nav pill is active for a scroll position
// - NavVisibility: hide the nav while scrolling down, show it when scrolling up
// - FrameThrottle: coalesce scroll events into one update per animation frame

use std::cell::Cell;

use super::config::ScrollConfig;

/// Geometry of one `section[id]` / `header[id]` / `footer[id]`
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: &str, top: f64, height: f64) -> Self {
        Self {
            id: id.to_string(),
            top,
            height,
        }
    }
}

/// Window/document measurements at the time of the scroll event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

pub struct ScrollSpy {
    config: ScrollConfig,
}

impl ScrollSpy {
    pub fn new(config: ScrollConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Id of the section whose nav link should be active
    pub fn active_section<'a>(&'a self, metrics: &ScrollMetrics, sections: &'a [SectionBounds]) -> &'a str {
        // Bottom of the page wins: the last section may be too short to reach the trigger line
        if metrics.scroll_y + metrics.viewport_height >= metrics.document_height - self.config.bottom_slack_px {
            return self.config.last_section.as_str();
        }
        if metrics.scroll_y < self.config.top_threshold_px {
            return self.config.first_section.as_str();
        }

        let trigger = metrics.scroll_y + metrics.viewport_height * self.config.trigger_ratio;
        sections
            .iter()
            .filter(|section| trigger >= section.top && self.config.has_nav_link(&section.id))
            .last()
            .map(|section| section.id.as_str())
            .unwrap_or(self.config.first_section.as_str())
    }

    /// `href` value of the link to highlight
    pub fn active_href(&self, metrics: &ScrollMetrics, sections: &[SectionBounds]) -> String {
        format!("#{}", self.active_section(metrics, sections))
    }
}

/// Visibility change to apply to the nav container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavChange {
    Show,
    Hide,
}

pub struct NavVisibility {
    last_scroll_y: f64,
    hidden: bool,
    pin_px: f64,
    delta_px: f64,
}

impl NavVisibility {
    pub fn new(initial_scroll_y: f64, config: &ScrollConfig) -> Self {
        Self {
            last_scroll_y: initial_scroll_y,
            hidden: false,
            pin_px: config.nav_pin_px,
            delta_px: config.nav_delta_px,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Feed the current scroll position; returns the change to apply, if any
    pub fn update(&mut self, scroll_y: f64) -> Option<NavChange> {
        let delta = scroll_y - self.last_scroll_y;
        self.last_scroll_y = scroll_y;

        if scroll_y < self.pin_px {
            // Near the top the nav is always shown; re-asserting is harmless
            self.hidden = false;
            return Some(NavChange::Show);
        }

        if delta > self.delta_px && !self.hidden {
            self.hidden = true;
            return Some(NavChange::Hide);
        }
        if delta < -self.delta_px && self.hidden {
            self.hidden = false;
            return Some(NavChange::Show);
        }
        None
    }
}

/// One pending update per animation frame
#[derive(Default)]
pub struct FrameThrottle {
    ticking: Cell<bool>,
}

impl FrameThrottle {
    /// True if the caller should request a frame
    pub fn request(&self) -> bool {
        !self.ticking.replace(true)
    }

    /// Call from the frame callback once the update ran
    pub fn complete(&self) {
        self.ticking.set(false);
    }
}
