// Video load coordinator
//
// Owns the load status of every managed video and sequences playback behind it:
// - preload: assign the deferred source, wait for `canplaythrough` / `error`
// - bulk preload: parallel or sequential, as decided by `policy`
// - hover and accordion bindings that only play once a video is ready
//
// Everything runs on the UI thread; state is shared through `Rc<RefCell<_>>`.

use futures::future::join_all;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::oneshot;

use super::models::{AccordionState, LoadStatus, PreloadHint, VideoId};
use super::policy::PreloadMode;
use super::state::LoadState;
use super::traits::{MediaElement, Panel};

/// Result of one bulk preload pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadSummary {
    pub loaded: usize,
    pub failed: usize,
    /// Videos without any source
    pub skipped: usize,
}

impl PreloadSummary {
    fn record(&mut self, status: LoadStatus) {
        match status {
            LoadStatus::Loaded => self.loaded += 1,
            LoadStatus::Error => self.failed += 1,
            LoadStatus::Unloaded | LoadStatus::Loading => self.skipped += 1,
        }
    }
}

/// A load whose listeners are registered and whose `load()` was triggered
struct PendingLoad<W> {
    id: VideoId,
    state: Rc<RefCell<LoadState>>,
    done: oneshot::Receiver<LoadStatus>,
    watch: Option<W>,
}

impl<W> PendingLoad<W> {
    async fn wait(mut self) -> LoadStatus {
        (&mut self.done).await.unwrap_or(LoadStatus::Error)
    }
}

impl<W> Drop for PendingLoad<W> {
    fn drop(&mut self) {
        // Listeners go first; a load abandoned before either event fired counts as failed
        self.watch.take();
        let mut state = self.state.borrow_mut();
        if state.status(self.id) == LoadStatus::Loading {
            log::warn!("[Coordinator] {} abandoned while loading", self.id);
            state.settle(self.id, LoadStatus::Error);
        }
    }
}

enum Begin<W> {
    Settled(LoadStatus),
    Joined(oneshot::Receiver<LoadStatus>),
    Started(PendingLoad<W>),
}

pub struct VideoLoadCoordinator {
    state: Rc<RefCell<LoadState>>,
}

impl VideoLoadCoordinator {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(LoadState::new())),
        }
    }

    pub fn status(&self, id: VideoId) -> LoadStatus {
        self.state.borrow().status(id)
    }

    pub fn count(&self, status: LoadStatus) -> usize {
        self.state.borrow().count(status)
    }

    /// Preload `video` and resolve once it can play through or has failed.
    ///
    /// Absent videos, settled videos and videos without any source resolve
    /// immediately. A second call while loading joins the first one.
    pub async fn preload<V: MediaElement>(&self, video: Option<&V>) -> LoadStatus {
        let Some(video) = video else {
            return LoadStatus::Unloaded;
        };
        Self::finish(self.begin(video)).await
    }

    fn begin<V: MediaElement>(&self, video: &V) -> Begin<V::Watch> {
        let id = video.id();
        match self.status(id) {
            settled @ (LoadStatus::Loaded | LoadStatus::Error) => return Begin::Settled(settled),
            LoadStatus::Loading => return Begin::Joined(self.state.borrow_mut().subscribe(id)),
            LoadStatus::Unloaded => {}
        }

        let assigned = video.assigned_source();
        let Some(source) = assigned.clone().or_else(|| video.deferred_source()) else {
            log::debug!("[Coordinator] {} has no source, skipping", id);
            return Begin::Settled(LoadStatus::Unloaded);
        };

        self.state.borrow_mut().advance(id, LoadStatus::Loading);

        if assigned.is_some() && video.ready_state().can_play_through() {
            log::debug!("[Coordinator] {} already buffered", id);
            return Begin::Settled(self.state.borrow_mut().settle(id, LoadStatus::Loaded));
        }

        if assigned.is_none() {
            video.assign_source(&source);
        }

        let done = self.state.borrow_mut().subscribe(id);
        let state = Rc::clone(&self.state);
        let watch = video.watch_readiness(Box::new(move |outcome| {
            let status = state.borrow_mut().settle(id, outcome.into());
            log::debug!("[Coordinator] {} settled: {}", id, status);
        }));

        log::debug!("[Coordinator] {} loading {}", id, source);
        video.load();

        Begin::Started(PendingLoad {
            id,
            state: Rc::clone(&self.state),
            done,
            watch: Some(watch),
        })
    }

    async fn finish<W>(begin: Begin<W>) -> LoadStatus {
        match begin {
            Begin::Settled(status) => status,
            Begin::Joined(done) => done.await.unwrap_or(LoadStatus::Error),
            Begin::Started(pending) => pending.wait().await,
        }
    }

    /// Bulk preload pass over every managed video
    pub async fn preload_all<V: MediaElement>(&self, videos: &[V], mode: PreloadMode) -> PreloadSummary {
        log::info!(
            "[Coordinator] Preloading {} videos ({:?})",
            videos.len(),
            mode
        );

        let mut summary = PreloadSummary::default();
        match mode {
            PreloadMode::Parallel => {
                // Trigger every load before awaiting any of them
                let started: Vec<_> = videos
                    .iter()
                    .map(|video| {
                        video.set_preload(PreloadHint::Auto);
                        (video, self.begin(video))
                    })
                    .collect();

                // Each video is marked as soon as it settles, whatever the others do
                let statuses = join_all(started.into_iter().map(|(video, begin)| async move {
                    let status = Self::finish(begin).await;
                    Self::mark_if_loaded(video, status);
                    status
                }))
                .await;
                for status in statuses {
                    summary.record(status);
                }
            }
            PreloadMode::Sequential => {
                for video in videos {
                    video.set_preload(PreloadHint::Auto);
                    let status = self.preload(Some(video)).await;
                    Self::mark_if_loaded(video, status);
                    summary.record(status);
                }
            }
        }

        log::info!(
            "[Coordinator] Preload pass done: {} loaded, {} failed, {} skipped",
            summary.loaded,
            summary.failed,
            summary.skipped
        );
        summary
    }

    fn mark_if_loaded<V: MediaElement>(video: &V, status: LoadStatus) {
        if status == LoadStatus::Loaded {
            video.mark_container_loaded();
        }
    }

    /// Videos start paused until someone interacts with their panel
    pub fn prepare<V: MediaElement>(&self, video: &V) {
        video.pause();
    }

    async fn play<V: MediaElement>(&self, video: &V) {
        if let Err(e) = video.play().await {
            log::debug!("[Coordinator] {} play rejected: {}", video.id(), e);
        }
    }

    /// Pointer entered the panel: start playback (best effort)
    pub async fn hover_enter<V: MediaElement>(&self, video: &V) {
        if self.status(video.id()) == LoadStatus::Error {
            return;
        }
        if video.ensure_source_assigned().is_none() {
            return;
        }
        self.play(video).await;
    }

    /// Pointer left the panel: stop unless the panel is open
    pub fn hover_leave<P: Panel, V: MediaElement>(&self, panel: &P, video: &V) {
        if !panel.is_open() {
            video.pause();
            video.rewind();
        }
    }

    /// Flip the panel between closed and open
    pub async fn toggle<P: Panel, V: MediaElement>(&self, panel: &P, video: Option<&V>) -> AccordionState {
        let next = AccordionState::from_open(panel.is_open()).toggled();
        match next {
            AccordionState::Open => self.open(panel, video).await,
            AccordionState::Closed => self.close(panel, video),
        }
        next
    }

    /// Open the panel and play its video once it is ready, if still open by then
    pub async fn open<P: Panel, V: MediaElement>(&self, panel: &P, video: Option<&V>) {
        panel.set_open(true);
        let Some(video) = video else {
            return;
        };

        if self.status(video.id()) == LoadStatus::Loaded {
            self.play(video).await;
            return;
        }

        video.ensure_source_assigned();
        let status = self.preload(Some(video)).await;

        if status != LoadStatus::Loaded {
            log::debug!("[Coordinator] {} not playable ({})", video.id(), status);
            return;
        }
        if panel.is_open() {
            self.play(video).await;
        }
    }

    /// Close the panel, stopping and rewinding its video
    pub fn close<P: Panel, V: MediaElement>(&self, panel: &P, video: Option<&V>) {
        panel.set_open(false);
        if let Some(video) = video {
            video.pause();
            video.rewind();
        }
    }
}

impl Default for VideoLoadCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
