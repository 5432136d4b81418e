// Entry animations: bento cards start hidden and fade in, staggered per batch

use std::time::Duration;

use super::config::RevealConfig;

/// Inline style pair applied to a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardStyle {
    pub opacity: &'static str,
    pub transform: &'static str,
}

pub struct RevealPlan {
    config: RevealConfig,
    hidden_transform: String,
}

impl RevealPlan {
    pub fn new(config: RevealConfig) -> Self {
        let hidden_transform = format!("translateY({}px)", config.offset_px);
        Self {
            config,
            hidden_transform,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    /// Style before the card scrolls into view
    pub fn hidden(&self) -> (&'static str, &str) {
        ("0", self.hidden_transform.as_str())
    }

    pub fn revealed(&self) -> CardStyle {
        CardStyle {
            opacity: "1",
            transform: "translateY(0)",
        }
    }

    /// Delay for the `index`-th entry of one observer batch
    pub fn delay_for(&self, index: usize) -> Duration {
        Duration::from_millis(self.config.stagger_ms as u64 * index as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stagger_grows_by_index() {
        let plan = RevealPlan::new(RevealConfig::default());
        assert_eq!(plan.delay_for(0), Duration::ZERO);
        assert_eq!(plan.delay_for(1), Duration::from_millis(120));
        assert_eq!(plan.delay_for(4), Duration::from_millis(480));
    }

    #[test]
    fn test_hidden_style_uses_offset() {
        let plan = RevealPlan::new(RevealConfig {
            offset_px: 45,
            ..RevealConfig::default()
        });
        assert_eq!(plan.hidden(), ("0", "translateY(45px)"));
        assert_eq!(plan.revealed().transform, "translateY(0)");
        assert_eq!(plan.threshold(), 0.1);
    }
}
