// Browser bindings (wasm32 only)
//
// Implements the collaborator traits on top of web-sys and exposes two entry points:
// - start_page(): main document (theme, animations, videos, scroll spy)
// - start_worker(): service worker (offline cache)

mod dom;
mod events;
mod network;
mod page;
mod storage;
mod worker;

use wasm_bindgen::prelude::*;

use crate::logging;
use crate::portfolio::config::{OfflineConfig, SiteConfig, CONFIG_ELEMENT_ID};

fn install_ambient() {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

/// Read `<script id="site-config">` overrides; defaults on absence or error
fn load_config(document: &web_sys::Document) -> SiteConfig {
    let Some(text) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return SiteConfig::default();
    };

    match SiteConfig::from_json(&text) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("[Page] Ignoring site config: {}", e);
            SiteConfig::default()
        }
    }
}

/// Page entry point; waits for DOMContentLoaded if the document is still parsing
#[wasm_bindgen]
pub fn start_page() {
    install_ambient();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("[Page] No document available");
        return;
    };

    let still_loading = js_sys::Reflect::get(&document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|state| state.as_string())
        .map_or(false, |state| state == "loading");

    if still_loading {
        let registered = events::listen_once(&document, "DOMContentLoaded", move |_| run_page());
        if let Err(e) = registered {
            log::error!("[Page] Could not wait for DOMContentLoaded: {}", e);
        }
    } else {
        run_page();
    }
}

fn run_page() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let config = load_config(&document);
    log::set_max_level(config.log_level());

    if let Err(e) = page::start(config) {
        log::error!("[Page] Initialization failed: {}", e);
    }
}

/// Service worker entry point
#[wasm_bindgen]
pub fn start_worker() {
    install_ambient();

    if let Err(e) = worker::start(OfflineConfig::default()) {
        log::error!("[ServiceWorker] Initialization failed: {}", e);
    }
}
