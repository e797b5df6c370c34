use crate::*;
use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::{self, Instant};

/// A provider together with its call limits.
pub struct ProviderSlot {
    provider: Box<dyn GeocodingProvider>,
    timeout: Duration,
    min_interval: Option<Duration>,
    last_call: Mutex<Option<Instant>>,
}

impl ProviderSlot {
    pub fn new<P>(provider: P, timeout: Duration) -> Self
    where
        P: GeocodingProvider + 'static,
    {
        Self {
            provider: Box::new(provider),
            timeout,
            min_interval: None,
            last_call: Mutex::new(None),
        }
    }

    /// Minimum spacing between the starts of two consecutive calls.
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = Some(min_interval);
        self
    }

    pub fn name(&self) -> &str {
        self.provider.name()
    }

    async fn wait_for_turn(&self) {
        let Some(min_interval) = self.min_interval else {
            return;
        };
        let last_call = *self.last_call.lock();
        if let Some(elapsed) = last_call.map(|at| at.elapsed()) {
            if elapsed < min_interval {
                let delay = min_interval - elapsed;
                debug!("Waiting {delay:?} before calling {}", self.name());
                time::sleep(delay).await;
            }
        }
    }

    async fn attempt(&self, query: &GeocodeQuery) -> Result<GeocodeResult, ProviderError> {
        self.wait_for_turn().await;
        *self.last_call.lock() = Some(Instant::now());
        time::timeout(self.timeout, self.provider.attempt(query))
            .await
            .unwrap_or(Err(ProviderError::Timeout))
    }
}

pub(crate) enum ChainFailure {
    NoProvider,
    Provider {
        provider: String,
        error: ProviderError,
    },
}

/// Providers ordered by preference.
///
/// Only the outcome of the last provider is final: earlier
/// providers fall through on errors and empty results.
pub struct ProviderChain {
    slots: Vec<ProviderSlot>,
}

impl ProviderChain {
    pub fn new(slots: Vec<ProviderSlot>) -> Self {
        Self { slots }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(ProviderSlot::name)
    }

    pub(crate) async fn resolve(
        &self,
        query: &GeocodeQuery,
    ) -> Result<GeocodeResult, ChainFailure> {
        let Some((last, preferred)) = self.slots.split_last() else {
            return Err(ChainFailure::NoProvider);
        };
        for slot in preferred {
            info!("Trying {} for '{query}'", slot.name());
            match slot.attempt(query).await {
                Ok(result) if !result.is_empty() => return Ok(result),
                Ok(_) => {
                    info!("{} found nothing for '{query}'", slot.name());
                }
                Err(err) => {
                    warn!("{} failed for '{query}', falling back: {err}", slot.name());
                }
            }
        }
        info!("Trying {} for '{query}'", last.name());
        last.attempt(query)
            .await
            .map_err(|error| ChainFailure::Provider {
                provider: last.name().to_owned(),
                error,
            })
    }
}
