// Service worker host: CacheStorage and fetch on the worker global scope

use async_trait::async_trait;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};
use web_sys::{Cache, CacheStorage, ExtendableEvent, FetchEvent, Response, ServiceWorkerGlobalScope};

use super::events::listen;
use crate::portfolio::config::OfflineConfig;
use crate::portfolio::errors::PortfolioError;
use crate::portfolio::offline::{CachePolicy, FetchRoute, OfflineCache};
use crate::portfolio::traits::{HttpResponse, OfflineHost};

// Unclassified rejections from CacheStorage are cache failures, from fetch() network failures
fn cache_error(e: JsValue) -> PortfolioError {
    match PortfolioError::from(e) {
        PortfolioError::Unknown(msg) => PortfolioError::CacheFailed(msg),
        other => other,
    }
}

fn network_error(e: JsValue) -> PortfolioError {
    match PortfolioError::from(e) {
        PortfolioError::Unknown(msg) => PortfolioError::NetworkFailed(msg),
        other => other,
    }
}

impl HttpResponse for Response {
    fn status(&self) -> u16 {
        Response::status(self)
    }

    fn duplicate(&self) -> Result<Self, PortfolioError> {
        Response::clone(self).map_err(cache_error)
    }
}

pub struct WorkerHost {
    scope: ServiceWorkerGlobalScope,
}

impl WorkerHost {
    pub fn new(scope: ServiceWorkerGlobalScope) -> Self {
        Self { scope }
    }

    fn caches(&self) -> Result<CacheStorage, PortfolioError> {
        self.scope.caches().map_err(cache_error)
    }

    async fn open(&self, name: &str) -> Result<Cache, PortfolioError> {
        let cache = JsFuture::from(self.caches()?.open(name))
            .await
            .map_err(cache_error)?;
        Ok(cache.unchecked_into())
    }
}

#[async_trait(?Send)]
impl OfflineHost for WorkerHost {
    type Response = Response;

    async fn cache_names(&self) -> Result<Vec<String>, PortfolioError> {
        let keys = JsFuture::from(self.caches()?.keys())
            .await
            .map_err(cache_error)?;
        Ok(js_sys::Array::from(&keys)
            .iter()
            .filter_map(|name| name.as_string())
            .collect())
    }

    async fn delete_cache(&self, name: &str) -> Result<bool, PortfolioError> {
        let deleted = JsFuture::from(self.caches()?.delete(name))
            .await
            .map_err(cache_error)?;
        Ok(deleted.as_bool().unwrap_or(false))
    }

    async fn add_all(&self, cache: &str, paths: &[String]) -> Result<(), PortfolioError> {
        let requests: js_sys::Array = paths.iter().map(|path| JsValue::from_str(path)).collect();
        let cache = self.open(cache).await?;
        JsFuture::from(cache.add_all_with_str_sequence(&requests))
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    async fn lookup(&self, cache: &str, url: &str) -> Result<Option<Response>, PortfolioError> {
        let cache = self.open(cache).await?;
        let hit = JsFuture::from(cache.match_with_str(url))
            .await
            .map_err(cache_error)?;
        // match() resolves to undefined on a miss
        Ok(hit.dyn_into::<Response>().ok())
    }

    async fn store(&self, cache: &str, url: &str, response: Response) -> Result<(), PortfolioError> {
        let cache = self.open(cache).await?;
        JsFuture::from(cache.put_with_str(url, &response))
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<Response, PortfolioError> {
        let response = JsFuture::from(self.scope.fetch_with_str(url))
            .await
            .map_err(network_error)?;
        response
            .dyn_into::<Response>()
            .map_err(|_| PortfolioError::NetworkFailed(format!("fetch({}) did not resolve to a Response", url)))
    }
}

/// Register install / activate / fetch handlers on the worker scope
pub fn start(config: OfflineConfig) -> Result<(), PortfolioError> {
    let scope: ServiceWorkerGlobalScope = js_sys::global()
        .dyn_into()
        .map_err(|_| PortfolioError::MissingElement("ServiceWorkerGlobalScope".to_string()))?;
    let origin = scope.location().origin();
    let cache = Rc::new(OfflineCache::new(
        Rc::new(WorkerHost::new(scope.clone())),
        CachePolicy::new(config),
    ));

    let (c, s) = (Rc::clone(&cache), scope.clone());
    listen(&scope, "install", move |event| {
        let event: ExtendableEvent = event.unchecked_into();
        let (c, s) = (Rc::clone(&c), s.clone());
        let work = future_to_promise(async move {
            // A failed pre-cache leaves the old worker in charge until the next attempt
            if c.install().await {
                JsFuture::from(s.skip_waiting()?).await?;
            }
            Ok(JsValue::UNDEFINED)
        });
        if let Err(e) = event.wait_until(&work) {
            log::warn!("[ServiceWorker] install waitUntil failed: {}", PortfolioError::from(e));
        }
    })?;

    let (c, s) = (Rc::clone(&cache), scope.clone());
    listen(&scope, "activate", move |event| {
        let event: ExtendableEvent = event.unchecked_into();
        let (c, s) = (Rc::clone(&c), s.clone());
        let work = future_to_promise(async move {
            match c.activate().await {
                Ok(deleted) => log::info!("[ServiceWorker] Activated, removed {} old caches", deleted.len()),
                Err(e) => log::warn!("[ServiceWorker] Cleanup failed: {}", e),
            }
            JsFuture::from(s.clients().claim()).await?;
            Ok(JsValue::UNDEFINED)
        });
        if let Err(e) = event.wait_until(&work) {
            log::warn!("[ServiceWorker] activate waitUntil failed: {}", PortfolioError::from(e));
        }
    })?;

    let c = Rc::clone(&cache);
    listen(&scope, "fetch", move |event| {
        let event: FetchEvent = event.unchecked_into();
        let request = event.request();
        let url = request.url();
        if matches!(c.policy().route(&request.method(), &url, &origin), FetchRoute::Passthrough) {
            return;
        }

        let c = Rc::clone(&c);
        let work = future_to_promise(async move {
            let served = c.respond(&url).await?;
            log::debug!("[ServiceWorker] {} served from {:?}", url, served.from);
            if let Some(task) = served.background {
                spawn_local(async move {
                    task.run().await;
                });
            }
            Ok(served.response.into())
        });
        if let Err(e) = event.respond_with(&work) {
            log::warn!("[ServiceWorker] respondWith failed: {}", PortfolioError::from(e));
        }
    })?;

    log::info!("[ServiceWorker] Ready ({})", cache.policy().cache_name());
    Ok(())
}
