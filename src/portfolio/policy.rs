// Network-aware preload policy
//
// Decides, once at start-up:
// - how the bulk preload pass loads videos (all at once vs. one at a time)
// - when the pass starts (short delay vs. browser idle time)
//
// The goal is to never compete with first paint on constrained links.

use std::time::Duration;

use super::config::PreloadConfig;
use super::models::{ConnectionClass, EffectiveType};

/// How the bulk pass triggers loads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadMode {
    /// Every video's load triggered in the same pass
    Parallel,
    /// Next video triggered only after the previous one settles
    Sequential,
}

/// When the bulk pass starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkStart {
    /// setTimeout
    After(Duration),
    /// requestIdleCallback with a timeout
    WhenIdle { timeout: Duration },
}

/// Collapse the reported effective type; unknown or unavailable means fast
pub fn classify_connection(effective_type: Option<EffectiveType>) -> ConnectionClass {
    match effective_type {
        Some(EffectiveType::TwoG) | Some(EffectiveType::Slow2G) => ConnectionClass::Slow,
        _ => ConnectionClass::Fast,
    }
}

/// Same as `classify_connection` for the raw `effectiveType` string
pub fn classify_raw(effective_type: Option<&str>) -> ConnectionClass {
    classify_connection(effective_type.and_then(EffectiveType::parse))
}

pub fn preload_mode(class: ConnectionClass) -> PreloadMode {
    match class {
        ConnectionClass::Fast => PreloadMode::Parallel,
        ConnectionClass::Slow => PreloadMode::Sequential,
    }
}

pub fn bulk_start(class: ConnectionClass, idle_supported: bool, config: &PreloadConfig) -> BulkStart {
    match class {
        ConnectionClass::Fast => {
            BulkStart::After(Duration::from_millis(config.fast_start_delay_ms as u64))
        }
        ConnectionClass::Slow if idle_supported => BulkStart::WhenIdle {
            timeout: Duration::from_millis(config.idle_timeout_ms as u64),
        },
        ConnectionClass::Slow => {
            BulkStart::After(Duration::from_millis(config.slow_start_delay_ms as u64))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2g_variants_are_slow() {
        assert_eq!(classify_raw(Some("2g")), ConnectionClass::Slow);
        assert_eq!(classify_raw(Some("slow-2g")), ConnectionClass::Slow);
    }

    #[test]
    fn test_fast_by_default() {
        assert_eq!(classify_raw(Some("4g")), ConnectionClass::Fast);
        assert_eq!(classify_raw(Some("3g")), ConnectionClass::Fast);
        assert_eq!(classify_raw(Some("")), ConnectionClass::Fast);
        assert_eq!(classify_raw(None), ConnectionClass::Fast);
    }

    #[test]
    fn test_mode_follows_class() {
        assert_eq!(preload_mode(ConnectionClass::Fast), PreloadMode::Parallel);
        assert_eq!(preload_mode(ConnectionClass::Slow), PreloadMode::Sequential);
    }

    #[test]
    fn test_bulk_start_schedule() {
        let config = PreloadConfig::default();
        assert_eq!(
            bulk_start(ConnectionClass::Fast, true, &config),
            BulkStart::After(Duration::from_millis(50))
        );
        assert_eq!(
            bulk_start(ConnectionClass::Slow, true, &config),
            BulkStart::WhenIdle {
                timeout: Duration::from_millis(3000)
            }
        );
        assert_eq!(
            bulk_start(ConnectionClass::Slow, false, &config),
            BulkStart::After(Duration::from_millis(500))
        );
    }
}
