// Start-up readiness report

use super::models::ReadyState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessReport {
    pub ready: usize,
    pub total: usize,
}

impl ReadinessReport {
    pub fn from_states<I: IntoIterator<Item = ReadyState>>(states: I) -> Self {
        let mut report = Self { ready: 0, total: 0 };
        for state in states {
            report.total += 1;
            if state.can_play_through() {
                report.ready += 1;
            }
        }
        report
    }

    pub fn log(&self) {
        log::info!("[Perf] Videos loaded: {}/{}", self.ready, self.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_playable_videos() {
        let report = ReadinessReport::from_states([
            ReadyState::HaveNothing,
            ReadyState::HaveFutureData,
            ReadyState::HaveEnoughData,
            ReadyState::HaveCurrentData,
        ]);
        assert_eq!(report, ReadinessReport { ready: 2, total: 4 });
    }

    #[test]
    fn test_empty_page() {
        let report = ReadinessReport::from_states(Vec::new());
        assert_eq!(report, ReadinessReport { ready: 0, total: 0 });
    }
}
