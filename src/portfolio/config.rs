// Site configuration
//
// Defaults reproduce the constants the page was tuned with. Any subset can be
// overridden from a JSON document embedded in the page:
//
//   <script type="application/json" id="site-config">{"scroll": {"trigger_ratio": 0.25}}</script>

use serde::Deserialize;

use super::errors::PortfolioError;

/// Element id holding the JSON overrides
pub const CONFIG_ELEMENT_ID: &str = "site-config";

/// Video preloading timings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PreloadConfig {
    /// Delay before the bulk pass on fast connections
    pub fast_start_delay_ms: u32,
    /// Delay before the bulk pass on slow connections without requestIdleCallback
    pub slow_start_delay_ms: u32,
    /// requestIdleCallback timeout on slow connections
    pub idle_timeout_ms: u32,
    /// Delay before logging the readiness report
    pub report_delay_ms: u32,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            fast_start_delay_ms: 50,
            slow_start_delay_ms: 500,
            idle_timeout_ms: 3000,
            report_delay_ms: 3000,
        }
    }
}

/// One nav entry: section id and its label
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavEntry {
    pub section_id: String,
    pub label: String,
}

impl NavEntry {
    pub fn new(section_id: &str, label: &str) -> Self {
        Self {
            section_id: section_id.to_string(),
            label: label.to_string(),
        }
    }
}

/// Scroll spy and nav visibility tuning
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Sections that have a nav link, in page order
    pub nav: Vec<NavEntry>,
    /// Section forced active near the top of the page
    pub first_section: String,
    /// Section forced active at the bottom of the page
    pub last_section: String,
    /// Trigger line as a fraction of viewport height
    pub trigger_ratio: f64,
    /// Scroll positions below this always select `first_section`
    pub top_threshold_px: f64,
    /// Distance from the document bottom that selects `last_section`
    pub bottom_slack_px: f64,
    /// Nav is always shown above this scroll position
    pub nav_pin_px: f64,
    /// Minimum scroll delta that hides or reveals the nav
    pub nav_delta_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            nav: vec![
                NavEntry::new("profile", "Home"),
                NavEntry::new("about", "About"),
                NavEntry::new("projects", "Projects"),
                NavEntry::new("contact", "Contact"),
            ],
            first_section: "profile".to_string(),
            last_section: "contact".to_string(),
            trigger_ratio: 0.3,
            top_threshold_px: 50.0,
            bottom_slack_px: 100.0,
            nav_pin_px: 60.0,
            nav_delta_px: 8.0,
        }
    }
}

impl ScrollConfig {
    pub fn has_nav_link(&self, section_id: &str) -> bool {
        self.nav.iter().any(|entry| entry.section_id == section_id)
    }

    pub fn label_for(&self, section_id: &str) -> Option<&str> {
        self.nav
            .iter()
            .find(|entry| entry.section_id == section_id)
            .map(|entry| entry.label.as_str())
    }
}

/// Entry animation tuning
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub stagger_ms: u32,
    pub threshold: f64,
    pub offset_px: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            stagger_ms: 120,
            threshold: 0.1,
            offset_px: 30,
        }
    }
}

/// Service worker bucket and pre-cache manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflineConfig {
    pub cache_name: String,
    pub manifest: Vec<String>,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            cache_name: "cv-portfolio-v1".to_string(),
            manifest: [
                "/",
                "/index.html",
                "/css/style.css",
                "/js/main.js",
                "/images/profile.jpg",
                "/images/candy-crush-demo.mp4",
                "/images/banking-demo.mp4",
                "/images/assembly-demo.mp4",
                "/images/app-demo.mp4",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
        }
    }
}

/// DOM hooks the page runtime looks for
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub theme_toggle_id: String,
    pub light_mode_class: String,
    pub cards: String,
    pub videos: String,
    pub preview_container: String,
    pub timeline_items: String,
    pub sections: String,
    pub nav_links: String,
    pub nav_container: String,
    pub nav_hidden_class: String,
    pub active_class: String,
    pub loaded_class: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            theme_toggle_id: "theme-toggle".to_string(),
            light_mode_class: "light-mode".to_string(),
            cards: ".bento-card".to_string(),
            videos: "video[data-src], video.lazy-video".to_string(),
            preview_container: ".project-preview".to_string(),
            timeline_items: ".timeline-item".to_string(),
            sections: "section[id], header[id], footer[id]".to_string(),
            nav_links: ".pill-nav-link".to_string(),
            nav_container: ".nav-container".to_string(),
            nav_hidden_class: "nav-hidden".to_string(),
            active_class: "active".to_string(),
            loaded_class: "loaded".to_string(),
        }
    }
}

/// Full runtime configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub selectors: Selectors,
    pub preload: PreloadConfig,
    pub scroll: ScrollConfig,
    pub reveal: RevealConfig,
    /// `log` level name: error, warn, info, debug, trace
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            preload: PreloadConfig::default(),
            scroll: ScrollConfig::default(),
            reveal: RevealConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl SiteConfig {
    /// Parse overrides; missing fields keep their defaults
    pub fn from_json(text: &str) -> Result<Self, PortfolioError> {
        let config: SiteConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PortfolioError> {
        if !(0.0..=1.0).contains(&self.scroll.trigger_ratio) {
            return Err(PortfolioError::InvalidConfig(format!(
                "scroll.trigger_ratio must be within 0..=1, got {}",
                self.scroll.trigger_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(PortfolioError::InvalidConfig(format!(
                "reveal.threshold must be within 0..=1, got {}",
                self.reveal.threshold
            )));
        }
        Ok(())
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_constants() {
        let config = SiteConfig::default();
        assert_eq!(config.preload.fast_start_delay_ms, 50);
        assert_eq!(config.preload.idle_timeout_ms, 3000);
        assert_eq!(config.scroll.trigger_ratio, 0.3);
        assert_eq!(config.scroll.label_for("profile"), Some("Home"));
    }

    #[test]
    fn test_offline_defaults() {
        let offline = OfflineConfig::default();
        assert_eq!(offline.cache_name, "cv-portfolio-v1");
        assert_eq!(offline.manifest.len(), 9);
        assert_eq!(offline.manifest[0], "/");
    }

    #[test]
    fn test_offline_section_is_not_page_config() {
        let err = SiteConfig::from_json(r#"{"offline": {"cache_name": "other"}}"#).unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidConfig(_)));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            SiteConfig::from_json(r#"{"scroll": {"trigger_ratio": 0.25}, "log_level": "debug"}"#)
                .unwrap();
        assert_eq!(config.scroll.trigger_ratio, 0.25);
        assert_eq!(config.scroll.last_section, "contact");
        assert_eq!(config.preload, PreloadConfig::default());
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_out_of_range_ratio_rejected() {
        let err = SiteConfig::from_json(r#"{"scroll": {"trigger_ratio": 3.0}}"#).unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = SiteConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidConfig(_)));
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let config = SiteConfig::default().with_log_level("chatty");
        assert_eq!(config.log_level(), log::LevelFilter::Info);
    }
}
