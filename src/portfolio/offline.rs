// Offline cache strategy for the service worker
//
// - install: pre-populate one named cache with the asset manifest
// - activate: drop every cache with a different name
// - fetch: stale-while-revalidate for same-origin GETs, everything else untouched
//
// Network and cache access go through `OfflineHost`; cache writes that should not
// delay the response are handed back as a `BackgroundTask` for the host to spawn.

use std::rc::Rc;

use super::config::OfflineConfig;
use super::errors::PortfolioError;
use super::traits::{HttpResponse, OfflineHost};

/// What the fetch handler does with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRoute {
    /// Leave it to the browser (non-GET, cross-origin)
    Passthrough,
    /// Answer from cache / network
    Handle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    Cache,
    Network,
}

pub struct CachePolicy {
    config: OfflineConfig,
}

impl CachePolicy {
    pub fn new(config: OfflineConfig) -> Self {
        Self { config }
    }

    pub fn cache_name(&self) -> &str {
        &self.config.cache_name
    }

    pub fn manifest(&self) -> &[String] {
        &self.config.manifest
    }

    pub fn route(&self, method: &str, url: &str, origin: &str) -> FetchRoute {
        if !method.eq_ignore_ascii_case("GET") {
            return FetchRoute::Passthrough;
        }
        if !is_same_origin(url, origin) {
            return FetchRoute::Passthrough;
        }
        FetchRoute::Handle
    }

    /// Caches left behind by previous versions
    pub fn stale_caches(&self, names: &[String]) -> Vec<String> {
        names
            .iter()
            .filter(|name| name.as_str() != self.config.cache_name)
            .cloned()
            .collect()
    }

    pub fn should_store(status: u16) -> bool {
        status == 200
    }
}

// "https://a.dev" must not match "https://a.dev.evil.io/x"
fn is_same_origin(url: &str, origin: &str) -> bool {
    match url.strip_prefix(origin) {
        Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
        None => false,
    }
}

/// Work to run after the response has been handed to the page
pub enum BackgroundTask<H: OfflineHost> {
    /// Refresh a cached entry from the network
    Revalidate {
        host: Rc<H>,
        cache_name: String,
        url: String,
    },
    /// Store a copy of a response fetched on a cache miss
    Store {
        host: Rc<H>,
        cache_name: String,
        url: String,
        response: H::Response,
    },
}

impl<H: OfflineHost> BackgroundTask<H> {
    /// True when the cache entry was written
    pub async fn run(self) -> bool {
        match self {
            Self::Revalidate {
                host,
                cache_name,
                url,
            } => match host.fetch(&url).await {
                Ok(fresh) if CachePolicy::should_store(fresh.status()) => {
                    store_logged(&*host, &cache_name, &url, fresh).await
                }
                Ok(fresh) => {
                    log::debug!("[OfflineCache] Not refreshing {} (HTTP {})", url, fresh.status());
                    false
                }
                Err(e) => {
                    // Offline: the cached copy already went out
                    log::debug!("[OfflineCache] Revalidation of {} failed: {}", url, e);
                    false
                }
            },
            Self::Store {
                host,
                cache_name,
                url,
                response,
            } => store_logged(&*host, &cache_name, &url, response).await,
        }
    }
}

async fn store_logged<H: OfflineHost>(host: &H, cache_name: &str, url: &str, response: H::Response) -> bool {
    match host.store(cache_name, url, response).await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("[OfflineCache] Failed to store {}: {}", url, e);
            false
        }
    }
}

pub struct Served<H: OfflineHost> {
    pub response: H::Response,
    pub from: ServedFrom,
    pub background: Option<BackgroundTask<H>>,
}

pub struct OfflineCache<H: OfflineHost> {
    host: Rc<H>,
    policy: CachePolicy,
}

impl<H: OfflineHost> OfflineCache<H> {
    pub fn new(host: Rc<H>, policy: CachePolicy) -> Self {
        Self { host, policy }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Pre-populate the cache. Failure is logged and never blocks install.
    pub async fn install(&self) -> bool {
        log::info!("[OfflineCache] Caching {} assets", self.policy.manifest().len());
        match self
            .host
            .add_all(self.policy.cache_name(), self.policy.manifest())
            .await
        {
            Ok(()) => true,
            Err(e) => {
                log::warn!("[OfflineCache] Cache failed: {}", e);
                false
            }
        }
    }

    /// Delete caches from previous versions; returns the deleted names
    pub async fn activate(&self) -> Result<Vec<String>, PortfolioError> {
        let names = self.host.cache_names().await?;
        let mut deleted = Vec::new();
        for name in self.policy.stale_caches(&names) {
            if self.host.delete_cache(&name).await? {
                log::info!("[OfflineCache] Deleted old cache {}", name);
                deleted.push(name);
            }
        }
        Ok(deleted)
    }

    /// Answer a same-origin GET
    pub async fn respond(&self, url: &str) -> Result<Served<H>, PortfolioError> {
        let cache_name = self.policy.cache_name().to_string();

        let cached = match self.host.lookup(&cache_name, url).await {
            Ok(hit) => hit,
            Err(e) => {
                log::warn!("[OfflineCache] Lookup of {} failed: {}", url, e);
                None
            }
        };

        if let Some(response) = cached {
            return Ok(Served {
                response,
                from: ServedFrom::Cache,
                background: Some(BackgroundTask::Revalidate {
                    host: Rc::clone(&self.host),
                    cache_name,
                    url: url.to_string(),
                }),
            });
        }

        let response = self.host.fetch(url).await?;
        if !CachePolicy::should_store(response.status()) {
            return Ok(Served {
                response,
                from: ServedFrom::Network,
                background: None,
            });
        }

        let background = match response.duplicate() {
            Ok(copy) => Some(BackgroundTask::Store {
                host: Rc::clone(&self.host),
                cache_name,
                url: url.to_string(),
                response: copy,
            }),
            Err(e) => {
                log::warn!("[OfflineCache] Could not copy {} for caching: {}", url, e);
                None
            }
        };

        Ok(Served {
            response,
            from: ServedFrom::Network,
            background,
        })
    }
}
