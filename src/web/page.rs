// Main document wiring

use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, HtmlElement, HtmlVideoElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

use super::dom::{query_all, BodyTheme, DomPanel, DomVideo};
use super::events::{listen, listen_passive, request_frame, request_idle, set_timeout};
use super::network;
use super::storage::{LocalStorage, NoStorage};
use crate::portfolio::config::SiteConfig;
use crate::portfolio::coordinator::VideoLoadCoordinator;
use crate::portfolio::errors::PortfolioError;
use crate::portfolio::models::VideoId;
use crate::portfolio::perf::ReadinessReport;
use crate::portfolio::policy::{self, BulkStart};
use crate::portfolio::reveal::RevealPlan;
use crate::portfolio::scroll::{FrameThrottle, NavChange, NavVisibility, ScrollMetrics, ScrollSpy, SectionBounds};
use crate::portfolio::theme::ThemeController;
use crate::portfolio::traits::{MediaElement, PreferenceStore};

pub fn start(config: SiteConfig) -> Result<(), PortfolioError> {
    let window = web_sys::window().ok_or_else(|| PortfolioError::MissingElement("window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| PortfolioError::MissingElement("document".to_string()))?;

    // Theme first so the stored preference lands before anything else changes
    setup_theme(&window, &document, &config)?;
    setup_reveal(&document, &config)?;

    let videos = discover_videos(&document, &config)?;
    let coordinator = Rc::new(VideoLoadCoordinator::new());
    schedule_bulk_preload(&window, &coordinator, &videos, &config)?;
    bind_timeline(&document, &coordinator, &videos, &config)?;

    setup_scroll_spy(&window, &document, &config)?;
    setup_nav_visibility(&window, &document, &config)?;

    let total = videos.len();
    schedule_report(&window, videos, &config)?;

    log::info!("[Page] System initialized with {} videos", total);
    Ok(())
}

fn body(document: &Document) -> Result<HtmlElement, PortfolioError> {
    document
        .body()
        .ok_or_else(|| PortfolioError::MissingElement("body".to_string()))
}

fn setup_theme(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), PortfolioError> {
    let selectors = &config.selectors;
    let button = document.get_element_by_id(&selectors.theme_toggle_id);
    let icon = button
        .as_ref()
        .and_then(|b| b.query_selector("i").ok().flatten());
    let surface = BodyTheme::new(body(document)?, icon, &selectors.light_mode_class);

    let store: Box<dyn PreferenceStore> = match LocalStorage::open(window) {
        Some(storage) => Box::new(storage),
        None => Box::new(NoStorage),
    };
    let mut controller = ThemeController::start(store, surface);

    let Some(button) = button else {
        log::debug!("[Theme] No #{} button, toggle disabled", selectors.theme_toggle_id);
        return Ok(());
    };
    listen(&button, "click", move |_| {
        let theme = controller.toggle();
        log::debug!("[Theme] Switched to {}", theme);
    })
}

fn setup_reveal(document: &Document, config: &SiteConfig) -> Result<(), PortfolioError> {
    let cards = query_all(document, &config.selectors.cards)?;
    if cards.is_empty() {
        return Ok(());
    }

    let plan = Rc::new(RevealPlan::new(config.reveal.clone()));
    let callback_plan = Rc::clone(&plan);
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            let Some(window) = web_sys::window() else {
                return;
            };
            for (index, entry) in entries.iter().enumerate() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                observer.unobserve(&target);

                let Ok(card) = target.dyn_into::<HtmlElement>() else {
                    continue;
                };
                let style = callback_plan.revealed();
                let delay = callback_plan.delay_for(index);
                let scheduled = set_timeout(&window, delay, move || {
                    let _ = card.style().set_property("opacity", style.opacity);
                    let _ = card.style().set_property("transform", style.transform);
                });
                if let Err(e) = scheduled {
                    log::debug!("[Reveal] Could not schedule card: {}", e);
                }
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(plan.threshold()));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();

    let (opacity, transform) = plan.hidden();
    for card in cards {
        if let Some(card) = card.dyn_ref::<HtmlElement>() {
            card.style().set_property("opacity", opacity)?;
            card.style().set_property("transform", transform)?;
        }
        observer.observe(&card);
    }
    Ok(())
}

/// Every `<video>` on the page, ids in document order
fn discover_videos(document: &Document, config: &SiteConfig) -> Result<Vec<DomVideo>, PortfolioError> {
    Ok(query_all(document, "video")?
        .into_iter()
        .filter_map(|element| element.dyn_into::<HtmlVideoElement>().ok())
        .enumerate()
        .map(|(index, element)| DomVideo::new(VideoId(index), element, &config.selectors))
        .collect())
}

fn schedule_bulk_preload(
    window: &Window,
    coordinator: &Rc<VideoLoadCoordinator>,
    videos: &[DomVideo],
    config: &SiteConfig,
) -> Result<(), PortfolioError> {
    let managed: Vec<DomVideo> = videos
        .iter()
        .filter(|video| video.matches(&config.selectors.videos))
        .cloned()
        .collect();
    if managed.is_empty() {
        return Ok(());
    }

    let effective = network::effective_type(window);
    let class = policy::classify_raw(effective.as_deref());
    let mode = policy::preload_mode(class);
    let start = policy::bulk_start(class, network::idle_callback_supported(window), &config.preload);
    log::info!(
        "[Page] Connection {} ({}), preload {:?} via {:?}",
        class,
        effective.as_deref().unwrap_or("unknown"),
        mode,
        start
    );

    let coordinator = Rc::clone(coordinator);
    let task = move || {
        spawn_local(async move {
            coordinator.preload_all(&managed, mode).await;
        })
    };

    match start {
        BulkStart::After(delay) => set_timeout(window, delay, task).map(|_| ()),
        BulkStart::WhenIdle { timeout } => request_idle(window, timeout, task),
    }
}

fn find_video(videos: &[DomVideo], element: &Element) -> Option<DomVideo> {
    videos
        .iter()
        .find(|video| video.element().unchecked_ref::<Element>() == element)
        .cloned()
}

fn bind_timeline(
    document: &Document,
    coordinator: &Rc<VideoLoadCoordinator>,
    videos: &[DomVideo],
    config: &SiteConfig,
) -> Result<(), PortfolioError> {
    let selectors = &config.selectors;
    for item in query_all(document, &selectors.timeline_items)? {
        let video = item
            .query_selector("video")?
            .and_then(|element| find_video(videos, &element))
            .map(Rc::new);
        let panel = Rc::new(DomPanel::new(item.clone(), &selectors.active_class));

        if let Some(video) = &video {
            coordinator.prepare(&**video);

            let (c, v) = (Rc::clone(coordinator), Rc::clone(video));
            listen(&item, "mouseenter", move |_| {
                let (c, v) = (Rc::clone(&c), Rc::clone(&v));
                spawn_local(async move { c.hover_enter(&*v).await });
            })?;

            let (c, v, p) = (Rc::clone(coordinator), Rc::clone(video), Rc::clone(&panel));
            listen(&item, "mouseleave", move |_| c.hover_leave(&*p, &*v))?;
        }

        let c = Rc::clone(coordinator);
        listen(&item, "click", move |_| {
            let (c, p, v) = (Rc::clone(&c), Rc::clone(&panel), video.clone());
            spawn_local(async move {
                let state = c.toggle(&*p, v.as_deref()).await;
                if let Some(v) = &v {
                    log::debug!("[Page] {} panel {:?}", v.id(), state);
                }
            });
        })?;
    }
    Ok(())
}

fn measure_sections(sections: &[HtmlElement]) -> Vec<SectionBounds> {
    sections
        .iter()
        .map(|section| SectionBounds::new(&section.id(), section.offset_top() as f64, section.offset_height() as f64))
        .collect()
}

fn scroll_metrics(window: &Window, document: &Document) -> ScrollMetrics {
    ScrollMetrics {
        scroll_y: window.scroll_y().unwrap_or(0.0),
        viewport_height: window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0),
        document_height: document
            .document_element()
            .map(|root| root.scroll_height() as f64)
            .unwrap_or(0.0),
    }
}

fn setup_scroll_spy(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), PortfolioError> {
    let sections: Vec<HtmlElement> = query_all(document, &config.selectors.sections)?
        .into_iter()
        .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
        .collect();
    let links = query_all(document, &config.selectors.nav_links)?;
    if links.is_empty() {
        return Ok(());
    }

    let spy = ScrollSpy::new(config.scroll.clone());
    let active_class = config.selectors.active_class.clone();
    let update = {
        let (window, document) = (window.clone(), document.clone());
        Rc::new(move || {
            let href = spy.active_href(&scroll_metrics(&window, &document), &measure_sections(&sections));
            for link in &links {
                let classes = link.class_list();
                let _ = classes.remove_1(&active_class);
                if link.get_attribute("href").as_deref() == Some(href.as_str()) {
                    let _ = classes.add_1(&active_class);
                }
            }
        })
    };

    let throttle = Rc::new(FrameThrottle::default());
    let frame_window = window.clone();
    let on_scroll = Rc::clone(&update);
    listen(window, "scroll", move |_| {
        if !throttle.request() {
            return;
        }
        let (update, throttle) = (Rc::clone(&on_scroll), Rc::clone(&throttle));
        if let Err(e) = request_frame(&frame_window, move || {
            update();
            throttle.complete();
        }) {
            log::debug!("[ScrollSpy] requestAnimationFrame failed: {}", e);
        }
    })?;

    update();
    Ok(())
}

fn setup_nav_visibility(window: &Window, document: &Document, config: &SiteConfig) -> Result<(), PortfolioError> {
    let Some(nav) = document.query_selector(&config.selectors.nav_container)? else {
        log::debug!("[Nav] No {} element, auto-hide disabled", config.selectors.nav_container);
        return Ok(());
    };

    let hidden_class = config.selectors.nav_hidden_class.clone();
    let mut state = NavVisibility::new(window.scroll_y().unwrap_or(0.0), &config.scroll);
    let scroll_window = window.clone();
    listen_passive(window, "scroll", move |_| {
        let scroll_y = scroll_window.scroll_y().unwrap_or(0.0);
        let classes = nav.class_list();
        let _ = match state.update(scroll_y) {
            Some(NavChange::Hide) => classes.add_1(&hidden_class),
            Some(NavChange::Show) => classes.remove_1(&hidden_class),
            None => Ok(()),
        };
    })
}

fn schedule_report(window: &Window, videos: Vec<DomVideo>, config: &SiteConfig) -> Result<(), PortfolioError> {
    let delay = Duration::from_millis(config.preload.report_delay_ms as u64);
    set_timeout(window, delay, move || {
        ReadinessReport::from_states(videos.iter().map(|video| video.ready_state())).log();
    })?;
    Ok(())
}
