// Collaborator traits: everything the page logic needs from the browser

use async_trait::async_trait;

use super::errors::PortfolioError;
use super::models::{LoadOutcome, PreloadHint, ReadyState, VideoId};
use super::theme::Theme;

/// One embedded `<video>` element
#[async_trait(?Send)]
pub trait MediaElement {
    /// Guard returned by `watch_readiness`; dropping it unregisters both listeners
    type Watch;

    fn id(&self) -> VideoId;

    /// `data-src`, if present and non-empty
    fn deferred_source(&self) -> Option<String>;

    /// Currently assigned `src`, if any
    fn assigned_source(&self) -> Option<String>;

    fn assign_source(&self, src: &str);

    fn ready_state(&self) -> ReadyState;

    fn set_preload(&self, hint: PreloadHint);

    /// Register one-shot `canplaythrough` / `error` listeners.
    ///
    /// `on_settle` runs at most once, for whichever event fires first.
    fn watch_readiness(&self, on_settle: Box<dyn FnOnce(LoadOutcome)>) -> Self::Watch;

    fn load(&self);

    async fn play(&self) -> Result<(), PortfolioError>;

    fn pause(&self);

    /// Seek back to the first frame
    fn rewind(&self);

    /// Flag the enclosing preview container as ready (no-op without one)
    fn mark_container_loaded(&self);

    /// Copy `data-src` into `src` when nothing is assigned yet.
    ///
    /// Returns the source now in effect.
    fn ensure_source_assigned(&self) -> Option<String> {
        match (self.assigned_source(), self.deferred_source()) {
            (Some(src), _) => Some(src),
            (None, Some(deferred)) => {
                self.assign_source(&deferred);
                Some(deferred)
            }
            (None, None) => None,
        }
    }
}

/// Accordion container (a `.timeline-item`)
pub trait Panel {
    fn is_open(&self) -> bool;
    fn set_open(&self, open: bool);
}

/// Persistent key-value store (localStorage)
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PortfolioError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PortfolioError>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, PortfolioError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PortfolioError> {
        (**self).set(key, value)
    }
}

/// Where a theme is rendered: body class and toggle icon
pub trait ThemeSurface {
    fn apply_theme(&self, theme: Theme);
}

/// HTTP response as seen by the offline cache
pub trait HttpResponse: Sized {
    fn status(&self) -> u16;

    /// Independent copy whose body can be consumed separately
    fn duplicate(&self) -> Result<Self, PortfolioError>;
}

/// Service worker environment: cache storage plus network
#[async_trait(?Send)]
pub trait OfflineHost {
    type Response: HttpResponse;

    async fn cache_names(&self) -> Result<Vec<String>, PortfolioError>;

    async fn delete_cache(&self, name: &str) -> Result<bool, PortfolioError>;

    /// Fetch every path and store it; all-or-nothing
    async fn add_all(&self, cache: &str, paths: &[String]) -> Result<(), PortfolioError>;

    async fn lookup(&self, cache: &str, url: &str)
        -> Result<Option<Self::Response>, PortfolioError>;

    async fn store(
        &self,
        cache: &str,
        url: &str,
        response: Self::Response,
    ) -> Result<(), PortfolioError>;

    async fn fetch(&self, url: &str) -> Result<Self::Response, PortfolioError>;
}
