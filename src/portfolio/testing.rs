// In-memory stand-ins for the browser, shared by the unit tests

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use super::errors::PortfolioError;
use super::models::{LoadOutcome, PreloadHint, ReadyState, VideoId};
use super::theme::Theme;
use super::traits::{HttpResponse, MediaElement, OfflineHost, Panel, PreferenceStore, ThemeSurface};

/// Let every other branch of a `tokio::join!` run up to its next await point
pub async fn run_pending() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

/// Ordered record of side effects across fakes
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: String) {
        self.0.borrow_mut().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

type Listener = Box<dyn FnOnce(LoadOutcome)>;

pub struct FakeWatch {
    slot: Rc<RefCell<Option<Listener>>>,
}

impl Drop for FakeWatch {
    fn drop(&mut self) {
        self.slot.borrow_mut().take();
    }
}

pub struct FakeVideo {
    id: VideoId,
    deferred: Option<String>,
    src: RefCell<Option<String>>,
    ready: Cell<ReadyState>,
    preload: Cell<Option<PreloadHint>>,
    listener: Rc<RefCell<Option<Listener>>>,
    registrations: Cell<usize>,
    load_calls: Cell<usize>,
    play_calls: Cell<usize>,
    pauses: Cell<usize>,
    rewinds: Cell<usize>,
    playing: Cell<bool>,
    reject_play: Cell<bool>,
    container_loaded: Cell<bool>,
    journal: Journal,
}

impl FakeVideo {
    fn build(id: usize, deferred: Option<&str>, src: Option<&str>, journal: &Journal) -> Self {
        Self {
            id: VideoId(id),
            deferred: deferred.map(str::to_string),
            src: RefCell::new(src.map(str::to_string)),
            ready: Cell::new(ReadyState::HaveNothing),
            preload: Cell::new(None),
            listener: Rc::new(RefCell::new(None)),
            registrations: Cell::new(0),
            load_calls: Cell::new(0),
            play_calls: Cell::new(0),
            pauses: Cell::new(0),
            rewinds: Cell::new(0),
            playing: Cell::new(false),
            reject_play: Cell::new(false),
            container_loaded: Cell::new(false),
            journal: journal.clone(),
        }
    }

    /// `<video data-src=...>` with nothing assigned yet
    pub fn deferred(id: usize, src: &str, journal: &Journal) -> Self {
        Self::build(id, Some(src), None, journal)
    }

    /// `<video src=...>`
    pub fn assigned(id: usize, src: &str, journal: &Journal) -> Self {
        Self::build(id, None, Some(src), journal)
    }

    pub fn without_source(id: usize, journal: &Journal) -> Self {
        Self::build(id, None, None, journal)
    }

    pub fn set_ready_state(&self, state: ReadyState) {
        self.ready.set(state);
    }

    pub fn reject_play(&self, reject: bool) {
        self.reject_play.set(reject);
    }

    /// Dispatch `canplaythrough` or `error`; false if nobody was listening
    pub fn fire(&self, outcome: LoadOutcome) -> bool {
        let listener = self.listener.borrow_mut().take();
        let Some(listener) = listener else {
            return false;
        };
        let name = match outcome {
            LoadOutcome::Ready => {
                self.ready.set(ReadyState::HaveEnoughData);
                "ready"
            }
            LoadOutcome::Failed => "error",
        };
        self.journal.push(format!("{} {}", name, self.id));
        listener(outcome);
        true
    }

    pub fn has_listener(&self) -> bool {
        self.listener.borrow().is_some()
    }

    pub fn registrations(&self) -> usize {
        self.registrations.get()
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.get()
    }

    pub fn play_calls(&self) -> usize {
        self.play_calls.get()
    }

    pub fn pauses(&self) -> usize {
        self.pauses.get()
    }

    pub fn rewinds(&self) -> usize {
        self.rewinds.get()
    }

    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    pub fn preload_hint(&self) -> Option<PreloadHint> {
        self.preload.get()
    }

    pub fn container_loaded(&self) -> bool {
        self.container_loaded.get()
    }
}

#[async_trait(?Send)]
impl MediaElement for FakeVideo {
    type Watch = FakeWatch;

    fn id(&self) -> VideoId {
        self.id
    }

    fn deferred_source(&self) -> Option<String> {
        self.deferred.clone()
    }

    fn assigned_source(&self) -> Option<String> {
        self.src.borrow().clone()
    }

    fn assign_source(&self, src: &str) {
        *self.src.borrow_mut() = Some(src.to_string());
    }

    fn ready_state(&self) -> ReadyState {
        self.ready.get()
    }

    fn set_preload(&self, hint: PreloadHint) {
        self.preload.set(Some(hint));
    }

    fn watch_readiness(&self, on_settle: Box<dyn FnOnce(LoadOutcome)>) -> FakeWatch {
        self.registrations.set(self.registrations.get() + 1);
        *self.listener.borrow_mut() = Some(on_settle);
        FakeWatch {
            slot: Rc::clone(&self.listener),
        }
    }

    fn load(&self) {
        self.load_calls.set(self.load_calls.get() + 1);
        self.journal.push(format!("load {}", self.id));
    }

    async fn play(&self) -> Result<(), PortfolioError> {
        self.play_calls.set(self.play_calls.get() + 1);
        if self.reject_play.get() {
            return Err(PortfolioError::PlaybackRejected("NotAllowedError".to_string()));
        }
        self.playing.set(true);
        Ok(())
    }

    fn pause(&self) {
        self.pauses.set(self.pauses.get() + 1);
        self.playing.set(false);
    }

    fn rewind(&self) {
        self.rewinds.set(self.rewinds.get() + 1);
    }

    fn mark_container_loaded(&self) {
        self.container_loaded.set(true);
    }
}

#[derive(Default)]
pub struct FakePanel {
    open: Cell<bool>,
}

impl Panel for FakePanel {
    fn is_open(&self) -> bool {
        self.open.get()
    }

    fn set_open(&self, open: bool) {
        self.open.set(open);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.values.borrow_mut().insert(key.to_string(), value.to_string());
        store
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PortfolioError> {
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PortfolioError> {
        if self.fail_writes.get() {
            return Err(PortfolioError::StorageUnavailable("QuotaExceededError".to_string()));
        }
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    applied: RefCell<Vec<Theme>>,
}

impl RecordingSurface {
    pub fn applied(&self) -> Vec<Theme> {
        self.applied.borrow().clone()
    }
}

impl ThemeSurface for RecordingSurface {
    fn apply_theme(&self, theme: Theme) {
        self.applied.borrow_mut().push(theme);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeResponse {
    pub status: u16,
    pub body: String,
}

impl FakeResponse {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn with_status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

impl HttpResponse for FakeResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn duplicate(&self) -> Result<Self, PortfolioError> {
        Ok(self.clone())
    }
}

/// Cache storage plus a scripted network
#[derive(Default)]
pub struct FakeHost {
    caches: RefCell<BTreeMap<String, HashMap<String, FakeResponse>>>,
    network: RefCell<HashMap<String, FakeResponse>>,
    fetches: RefCell<Vec<String>>,
    fail_add_all: Cell<bool>,
}

impl FakeHost {
    pub fn with_cache(self, name: &str) -> Self {
        self.caches.borrow_mut().entry(name.to_string()).or_default();
        self
    }

    pub fn serve(&self, url: &str, response: FakeResponse) {
        self.network.borrow_mut().insert(url.to_string(), response);
    }

    pub fn go_offline(&self) {
        self.network.borrow_mut().clear();
    }

    pub fn fail_add_all(&self, fail: bool) {
        self.fail_add_all.set(fail);
    }

    pub fn cached(&self, cache: &str, url: &str) -> Option<FakeResponse> {
        self.caches.borrow().get(cache).and_then(|c| c.get(url).cloned())
    }

    pub fn put(&self, cache: &str, url: &str, response: FakeResponse) {
        self.caches
            .borrow_mut()
            .entry(cache.to_string())
            .or_default()
            .insert(url.to_string(), response);
    }

    pub fn names(&self) -> Vec<String> {
        self.caches.borrow().keys().cloned().collect()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.borrow().clone()
    }
}

#[async_trait(?Send)]
impl OfflineHost for FakeHost {
    type Response = FakeResponse;

    async fn cache_names(&self) -> Result<Vec<String>, PortfolioError> {
        Ok(self.names())
    }

    async fn delete_cache(&self, name: &str) -> Result<bool, PortfolioError> {
        Ok(self.caches.borrow_mut().remove(name).is_some())
    }

    async fn add_all(&self, cache: &str, paths: &[String]) -> Result<(), PortfolioError> {
        if self.fail_add_all.get() {
            return Err(PortfolioError::CacheFailed("Cache.addAll() rejected".to_string()));
        }
        let mut fetched = Vec::with_capacity(paths.len());
        for path in paths {
            fetched.push((path, self.fetch(path).await?));
        }
        for (path, response) in fetched {
            self.put(cache, path, response);
        }
        Ok(())
    }

    async fn lookup(&self, cache: &str, url: &str) -> Result<Option<FakeResponse>, PortfolioError> {
        Ok(self.cached(cache, url))
    }

    async fn store(&self, cache: &str, url: &str, response: FakeResponse) -> Result<(), PortfolioError> {
        self.put(cache, url, response);
        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<FakeResponse, PortfolioError> {
        self.fetches.borrow_mut().push(url.to_string());
        self.network
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| PortfolioError::NetworkFailed(format!("Failed to fetch {}", url)))
    }
}
