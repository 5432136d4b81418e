// DOM-backed collaborators: videos, accordion panels, theme surface

use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, HtmlVideoElement};

use crate::portfolio::config::Selectors;
use crate::portfolio::errors::PortfolioError;
use crate::portfolio::models::{LoadOutcome, PreloadHint, ReadyState, VideoId};
use crate::portfolio::theme::Theme;
use crate::portfolio::traits::{MediaElement, Panel, ThemeSurface};

/// Every element matching `selector`, in document order
pub fn query_all(root: &Document, selector: &str) -> Result<Vec<Element>, PortfolioError> {
    let list = root.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// `canplaythrough` + `error` listeners for one load; dropping removes both
pub struct ReadinessListeners {
    target: EventTarget,
    on_ready: Closure<dyn FnMut(Event)>,
    on_error: Closure<dyn FnMut(Event)>,
}

impl Drop for ReadinessListeners {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("canplaythrough", self.on_ready.as_ref().unchecked_ref());
        let _ = self
            .target
            .remove_event_listener_with_callback("error", self.on_error.as_ref().unchecked_ref());
    }
}

#[derive(Clone)]
pub struct DomVideo {
    id: VideoId,
    element: HtmlVideoElement,
    preview_selector: String,
    loaded_class: String,
}

impl DomVideo {
    pub fn new(id: VideoId, element: HtmlVideoElement, selectors: &Selectors) -> Self {
        Self {
            id,
            element,
            preview_selector: selectors.preview_container.clone(),
            loaded_class: selectors.loaded_class.clone(),
        }
    }

    pub fn element(&self) -> &HtmlVideoElement {
        &self.element
    }

    pub fn matches(&self, selector: &str) -> bool {
        self.element.matches(selector).unwrap_or(false)
    }
}

#[async_trait(?Send)]
impl MediaElement for DomVideo {
    type Watch = ReadinessListeners;

    fn id(&self) -> VideoId {
        self.id
    }

    fn deferred_source(&self) -> Option<String> {
        self.element.dataset().get("src").filter(|src| !src.is_empty())
    }

    fn assigned_source(&self) -> Option<String> {
        Some(self.element.src()).filter(|src| !src.is_empty())
    }

    fn assign_source(&self, src: &str) {
        self.element.set_src(src);
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::from_raw(self.element.ready_state())
    }

    fn set_preload(&self, hint: PreloadHint) {
        self.element.set_preload(hint.as_str());
    }

    fn watch_readiness(&self, on_settle: Box<dyn FnOnce(LoadOutcome)>) -> ReadinessListeners {
        let slot = Rc::new(RefCell::new(Some(on_settle)));
        let make = |outcome: LoadOutcome| {
            let slot = Rc::clone(&slot);
            Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                let callback = slot.borrow_mut().take();
                if let Some(callback) = callback {
                    callback(outcome);
                }
            })
        };
        let on_ready = make(LoadOutcome::Ready);
        let on_error = make(LoadOutcome::Failed);

        let target: EventTarget = self.element.clone().into();
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        for (event, closure) in [("canplaythrough", &on_ready), ("error", &on_error)] {
            if let Err(e) = target.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                &options,
            ) {
                log::warn!("[Video] {} could not listen for {}: {}", self.id, event, PortfolioError::from(e));
            }
        }

        ReadinessListeners {
            target,
            on_ready,
            on_error,
        }
    }

    fn load(&self) {
        self.element.load();
    }

    async fn play(&self) -> Result<(), PortfolioError> {
        let promise = self.element.play()?;
        JsFuture::from(promise).await?;
        Ok(())
    }

    fn pause(&self) {
        if let Err(e) = self.element.pause() {
            log::debug!("[Video] {} pause failed: {}", self.id, PortfolioError::from(e));
        }
    }

    fn rewind(&self) {
        self.element.set_current_time(0.0);
    }

    fn mark_container_loaded(&self) {
        if let Ok(Some(container)) = self.element.closest(&self.preview_selector) {
            let _ = container.class_list().add_1(&self.loaded_class);
        }
    }
}

/// `.timeline-item`; open state lives in its `active` class
pub struct DomPanel {
    element: Element,
    active_class: String,
}

impl DomPanel {
    pub fn new(element: Element, active_class: &str) -> Self {
        Self {
            element,
            active_class: active_class.to_string(),
        }
    }
}

impl Panel for DomPanel {
    fn is_open(&self) -> bool {
        self.element.class_list().contains(&self.active_class)
    }

    fn set_open(&self, open: bool) {
        let classes = self.element.class_list();
        let result = if open {
            classes.add_1(&self.active_class)
        } else {
            classes.remove_1(&self.active_class)
        };
        if let Err(e) = result {
            log::debug!("[Panel] class update failed: {}", PortfolioError::from(e));
        }
    }
}

/// `<body>` class plus the toggle button's icon
pub struct BodyTheme {
    body: HtmlElement,
    icon: Option<Element>,
    light_class: String,
}

impl BodyTheme {
    pub fn new(body: HtmlElement, icon: Option<Element>, light_class: &str) -> Self {
        Self {
            body,
            icon,
            light_class: light_class.to_string(),
        }
    }
}

impl ThemeSurface for BodyTheme {
    fn apply_theme(&self, theme: Theme) {
        let _ = self
            .body
            .class_list()
            .toggle_with_force(&self.light_class, theme.is_light());
        if let Some(icon) = &self.icon {
            let _ = icon
                .class_list()
                .replace(theme.toggled().icon_class(), theme.icon_class());
        }
    }
}
