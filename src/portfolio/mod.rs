// Page runtime - platform-independent policies and state machines

pub mod config;
pub mod coordinator;
pub mod errors;
pub mod models;
pub mod offline;
pub mod perf;
pub mod policy;
pub mod reveal;
pub mod scroll;
pub mod state;
pub mod theme;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use config::SiteConfig;
pub use coordinator::{PreloadSummary, VideoLoadCoordinator};
pub use errors::PortfolioError;
pub use models::{AccordionState, ConnectionClass, EffectiveType, LoadOutcome, LoadStatus, ReadyState, VideoId};
pub use offline::{CachePolicy, FetchRoute, OfflineCache};
pub use policy::{BulkStart, PreloadMode};
pub use theme::{Theme, ThemeController};
pub use traits::{HttpResponse, MediaElement, OfflineHost, Panel, PreferenceStore, ThemeSurface};
