use crate::{
    chain::{ChainFailure, ProviderChain},
    policy::QueuePolicy,
    *,
};
use parking_lot::Mutex;
use std::{collections::VecDeque, sync::Arc};
use tokio::{sync::oneshot, task, time};

type Reply = oneshot::Sender<Result<GeocodeResult, GeocodeError>>;

struct GeocodeRequest {
    key: String,
    query: GeocodeQuery,
    retries: u32,
    reply: Reply,
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<GeocodeRequest>,
    draining: bool,
}

struct Inner {
    chain: ProviderChain,
    policy: QueuePolicy,
    cache: Mutex<GeocodeCache>,
    queue: Mutex<QueueState>,
}

/// Serialized, cached geocoding.
///
/// Cache misses are queued and processed one after another by a
/// single drain task, so at most one provider request is in flight
/// at any time. Lookups that fail transiently are moved to the end
/// of the queue instead of blocking it.
///
/// Create one service per process and share clones of it.
#[derive(Clone)]
pub struct GeocodeService {
    inner: Arc<Inner>,
}

impl GeocodeService {
    pub fn new(chain: ProviderChain, cache: GeocodeCache, policy: QueuePolicy) -> Self {
        if chain.is_empty() {
            warn!("No geocoding provider configured");
        }
        let inner = Inner {
            chain,
            policy,
            cache: Mutex::new(cache),
            queue: Mutex::new(QueueState::default()),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Resolves a lookup key.
    ///
    /// Invalid keys are rejected right away without touching the queue.
    /// Cached results (including "not found") are returned without
    /// waiting. Everything else waits for its turn in the queue.
    pub async fn lookup(&self, key: impl Into<String>) -> Result<GeocodeResult, GeocodeError> {
        let key = key.into();
        let query = GeocodeQuery::parse(&key)?;
        if let Some(result) = self.cached(&key) {
            debug!("Cache hit for '{key}'");
            return Ok(result);
        }
        let (reply, response) = oneshot::channel();
        self.enqueue(GeocodeRequest {
            key,
            query,
            retries: 0,
            reply,
        });
        response.await.unwrap_or(Err(GeocodeError::Dropped))
    }

    pub async fn search(&self, text: &str) -> Result<GeocodeResult, GeocodeError> {
        let query = GeocodeQuery::search(text)?;
        self.lookup(query.key()).await
    }

    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<GeocodeResult, GeocodeError> {
        let query = GeocodeQuery::reverse(lat, lon)?;
        self.lookup(query.key()).await
    }

    /// Number of queued lookups that are not yet being processed.
    pub fn pending(&self) -> usize {
        self.inner.queue.lock().pending.len()
    }

    pub fn cached(&self, key: &str) -> Option<GeocodeResult> {
        self.inner.cache.lock().get(key).cloned()
    }

    pub fn cache_len(&self) -> usize {
        self.inner.cache.lock().len()
    }

    /// All cached entries, sorted by key.
    pub fn cache_entries(&self) -> Vec<(String, GeocodeResult)> {
        let mut entries: Vec<_> = self
            .inner
            .cache
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }

    pub fn clear_cache(&self) -> Result<(), CacheStoreError> {
        self.inner.cache.lock().clear()
    }

    fn enqueue(&self, request: GeocodeRequest) {
        let mut queue = self.inner.queue.lock();
        queue.pending.push_back(request);
        if queue.draining {
            return;
        }
        queue.draining = true;
        drop(queue);
        tokio::spawn(Arc::clone(&self.inner).drain());
    }
}

/// Resets the queue if the drain task dies unexpectedly.
///
/// Dropping the pending requests closes their reply channels,
/// so the waiting callers are rejected instead of hanging.
struct DrainGuard<'a> {
    inner: &'a Inner,
    finished: bool,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut queue = self.inner.queue.lock();
        error!(
            "Geocoding queue stopped unexpectedly, dropping {} pending lookups",
            queue.pending.len()
        );
        queue.pending.clear();
        queue.draining = false;
    }
}

impl Inner {
    async fn drain(self: Arc<Self>) {
        let mut guard = DrainGuard {
            inner: &self,
            finished: false,
        };
        loop {
            let request = {
                let mut queue = self.queue.lock();
                match queue.pending.pop_front() {
                    Some(request) => request,
                    None => {
                        queue.draining = false;
                        guard.finished = true;
                        return;
                    }
                }
            };
            self.process(request).await;
        }
    }

    async fn process(&self, request: GeocodeRequest) {
        let GeocodeRequest {
            key,
            query,
            retries,
            reply,
        } = request;

        // A duplicate might have been resolved while this one was waiting.
        let cached = self.cache.lock().get(&key).cloned();
        if let Some(result) = cached {
            debug!("Cache hit for queued '{key}'");
            let _ = reply.send(Ok(result));
            return;
        }

        let (provider, error) = match self.chain.resolve(&query).await {
            Ok(result) => {
                let pending = self.cache.lock().insert(key, result.clone());
                if let Err(err) = task::spawn_blocking(move || pending.save()).await {
                    error!("Unable to persist the geocoding cache: {err}");
                }
                let _ = reply.send(Ok(result));
                return;
            }
            Err(ChainFailure::NoProvider) => {
                let _ = reply.send(Err(GeocodeError::NoProvider));
                return;
            }
            Err(ChainFailure::Provider { provider, error }) => (provider, error),
        };

        let max_retries = if error.is_throttled() {
            self.policy.max_throttled_retries
        } else if error.is_transient() {
            self.policy.max_failed_retries
        } else {
            warn!("Geocoding '{key}' failed: {error}");
            let _ = reply.send(Err(GeocodeError::Provider {
                provider,
                source: error,
            }));
            return;
        };

        if retries >= max_retries {
            warn!("Giving up on '{key}' after {retries} retries: {error}");
            let _ = reply.send(Err(GeocodeError::RetriesExhausted {
                key,
                retries,
                last: error,
            }));
            return;
        }

        let throttled = error.is_throttled();
        warn!(
            "{provider} failed for '{key}' ({error}), retry {}/{max_retries} later",
            retries + 1
        );
        self.queue.lock().pending.push_back(GeocodeRequest {
            key,
            query,
            retries: retries + 1,
            reply,
        });
        if throttled {
            time::sleep(self.policy.throttle_backoff).await;
        }
    }
}
