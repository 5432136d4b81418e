// Per-video load status, owned by one coordinator

use std::collections::HashMap;
use tokio::sync::oneshot;

use super::models::{LoadStatus, VideoId};

#[derive(Default)]
pub struct LoadState {
    statuses: HashMap<VideoId, LoadStatus>,
    waiters: HashMap<VideoId, Vec<oneshot::Sender<LoadStatus>>>,
}

impl LoadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded status; videos never seen are `Unloaded`
    pub fn status(&self, id: VideoId) -> LoadStatus {
        self.statuses.get(&id).copied().unwrap_or_default()
    }

    /// Move `id` forward to `next`. Backward or repeated transitions are refused.
    pub fn advance(&mut self, id: VideoId, next: LoadStatus) -> bool {
        let current = self.status(id);
        if !current.can_advance_to(next) {
            log::debug!("[LoadState] {} refused {} -> {}", id, current, next);
            return false;
        }
        self.statuses.insert(id, next);
        true
    }

    /// Wait for an in-flight load of `id` to settle
    pub fn subscribe(&mut self, id: VideoId) -> oneshot::Receiver<LoadStatus> {
        let (tx, rx) = oneshot::channel();
        self.waiters.entry(id).or_default().push(tx);
        rx
    }

    /// Record the final status and release every waiter
    pub fn settle(&mut self, id: VideoId, status: LoadStatus) -> LoadStatus {
        self.advance(id, status);
        let settled = self.status(id);
        for waiter in self.waiters.remove(&id).unwrap_or_default() {
            let _ = waiter.send(settled);
        }
        settled
    }

    pub fn count(&self, status: LoadStatus) -> usize {
        self.statuses.values().filter(|s| **s == status).count()
    }

    /// Number of videos with an entry
    pub fn tracked(&self) -> usize {
        self.statuses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_video_is_unloaded() {
        let state = LoadState::new();
        assert_eq!(state.status(VideoId(7)), LoadStatus::Unloaded);
        assert_eq!(state.tracked(), 0);
    }

    #[test]
    fn test_settled_status_never_regresses() {
        let mut state = LoadState::new();
        let id = VideoId(0);
        assert!(state.advance(id, LoadStatus::Loading));
        assert!(state.advance(id, LoadStatus::Loaded));
        assert!(!state.advance(id, LoadStatus::Loading));
        assert!(!state.advance(id, LoadStatus::Error));
        assert_eq!(state.status(id), LoadStatus::Loaded);
    }

    #[tokio::test]
    async fn test_settle_releases_all_waiters() {
        let mut state = LoadState::new();
        let id = VideoId(1);
        state.advance(id, LoadStatus::Loading);
        let first = state.subscribe(id);
        let second = state.subscribe(id);

        assert_eq!(state.settle(id, LoadStatus::Error), LoadStatus::Error);
        assert_eq!(first.await.unwrap(), LoadStatus::Error);
        assert_eq!(second.await.unwrap(), LoadStatus::Error);
        assert_eq!(state.count(LoadStatus::Error), 1);
    }
}
