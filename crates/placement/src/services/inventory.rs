//! Inventory lookup client: trait, HTTP adapter, and in-memory test double.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use domain::{InventoryLevel, InventorySnapshot, SkuCode};
use thiserror::Error;

/// Errors from a single inventory lookup.
///
/// The client never retries; transient errors are the guard's to handle.
#[derive(Debug, Clone, Error)]
pub enum InventoryError {
    /// The call did not complete in time.
    #[error("inventory call timed out")]
    Timeout,

    /// The service could not be reached.
    #[error("inventory service unreachable: {0}")]
    Unreachable(String),

    /// The service answered with something unusable.
    #[error("bad inventory response: {0}")]
    BadResponse(String),
}

impl InventoryError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Unreachable(_))
    }
}

/// Synchronous availability lookup against the inventory service.
///
/// Callers pass a deduplicated, non-empty SKU set; the response covers
/// only the SKUs the service knows about.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Returns current availability for the given SKUs.
    async fn check_stock(&self, sku_codes: &[SkuCode])
    -> Result<InventorySnapshot, InventoryError>;
}

/// HTTP adapter for the inventory service's check-stock endpoint.
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInventoryClient {
    /// Creates a client against `base_url`, e.g. `http://inventory:8082`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    async fn check_stock(
        &self,
        sku_codes: &[SkuCode],
    ) -> Result<InventorySnapshot, InventoryError> {
        let url = format!("{}/api/inventory/checkstock", self.base_url);
        let query: Vec<(&str, &str)> = sku_codes
            .iter()
            .map(|sku| ("skuCode", sku.as_str()))
            .collect();

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::BadResponse(format!("status {status}")));
        }

        let levels: Vec<InventoryLevel> = response
            .json()
            .await
            .map_err(|e| InventoryError::BadResponse(e.to_string()))?;

        if levels.is_empty() && !sku_codes.is_empty() {
            return Err(InventoryError::BadResponse(
                "no inventory data in response".to_string(),
            ));
        }

        Ok(InventorySnapshot::from_levels(levels))
    }
}

fn classify_transport_error(err: reqwest::Error) -> InventoryError {
    if err.is_timeout() {
        InventoryError::Timeout
    } else {
        InventoryError::Unreachable(err.to_string())
    }
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    levels: HashMap<SkuCode, u32>,
    scripted_failures: VecDeque<InventoryError>,
    delay: Option<Duration>,
}

/// In-memory inventory client for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryClient {
    state: Arc<Mutex<InMemoryInventoryState>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryInventoryClient {
    /// Creates a new in-memory inventory client with no known SKUs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the available quantity for a SKU.
    pub fn set_level(&self, sku_code: impl Into<SkuCode>, quantity: u32) {
        self.state
            .lock()
            .unwrap()
            .levels
            .insert(sku_code.into(), quantity);
    }

    /// Queues an error served to upcoming calls, FIFO, before any lookup.
    pub fn fail_next_with(&self, error: InventoryError) {
        self.state
            .lock()
            .unwrap()
            .scripted_failures
            .push_back(error);
    }

    /// Adds artificial latency to every call.
    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }

    /// Number of calls that reached the client.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InventoryClient for InMemoryInventoryClient {
    async fn check_stock(
        &self,
        sku_codes: &[SkuCode],
    ) -> Result<InventorySnapshot, InventoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let (failure, delay, levels) = {
            let mut state = self.state.lock().unwrap();
            (
                state.scripted_failures.pop_front(),
                state.delay,
                state.levels.clone(),
            )
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = failure {
            return Err(error);
        }

        let known = sku_codes
            .iter()
            .filter_map(|sku| {
                levels.get(sku).map(|quantity| InventoryLevel {
                    sku_code: sku.clone(),
                    quantity: *quantity,
                })
            })
            .collect::<Vec<_>>();

        Ok(InventorySnapshot::from_levels(known))
    }
}
