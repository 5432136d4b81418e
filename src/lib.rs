pub mod logging;
pub mod portfolio;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{start_page, start_worker};

pub use portfolio::{
    LoadStatus, PortfolioError, PreloadMode, SiteConfig, Theme, VideoLoadCoordinator,
};
