//! Resilience wrapper around the inventory dependency.
//!
//! Applies a per-call timeout, retry with exponential backoff, and a
//! circuit breaker. Callers receive either a fresh snapshot or a typed
//! degraded value; the guard never fabricates availability.

pub mod breaker;
pub mod retry;

use std::sync::Arc;
use std::time::Duration;

use domain::{InventorySnapshot, SkuCode};

use crate::services::inventory::{InventoryClient, InventoryError};
use breaker::{BreakerConfig, CircuitBreaker};
use retry::RetryConfig;

/// Tuning for the full guard: breaker, retry, and per-call timeout.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub breaker: BreakerConfig,
    pub retry: RetryConfig,
    /// Bound on a single inventory call; elapsing counts as a failure.
    pub call_timeout: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            breaker: BreakerConfig::default(),
            retry: RetryConfig::default(),
            call_timeout: Duration::from_secs(3),
        }
    }
}

/// Result of a guarded inventory query.
#[derive(Debug, Clone)]
pub enum GuardedInventory {
    /// The dependency answered; availability was truly checked.
    Fresh(InventorySnapshot),
    /// The dependency could not be consulted; availability is unknown.
    Degraded(DegradeReason),
}

/// Why the guard fell back instead of returning a snapshot.
#[derive(Debug, Clone)]
pub enum DegradeReason {
    /// The breaker short-circuited the call before it reached the network.
    CircuitOpen,
    /// Every admitted attempt failed.
    AttemptsExhausted {
        attempts: u32,
        last_error: InventoryError,
    },
}

impl std::fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CircuitOpen => write!(f, "inventory circuit open"),
            Self::AttemptsExhausted {
                attempts,
                last_error,
            } => write!(
                f,
                "inventory unavailable after {attempts} attempts: {last_error}"
            ),
        }
    }
}

/// Timeout, retry, and circuit breaking around an [`InventoryClient`].
pub struct InventoryGuard<C> {
    client: C,
    config: GuardConfig,
    breaker: Arc<CircuitBreaker>,
}

impl<C: InventoryClient> InventoryGuard<C> {
    /// Creates a guard owning a fresh breaker.
    pub fn new(client: C, config: GuardConfig) -> Self {
        let breaker = Arc::new(CircuitBreaker::new(config.breaker.clone()));
        Self {
            client,
            config,
            breaker,
        }
    }

    /// Creates a guard around an externally owned breaker, letting tests
    /// and operators inspect or trip the state machine directly.
    pub fn with_breaker(client: C, config: GuardConfig, breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            client,
            config,
            breaker,
        }
    }

    /// Handle to the breaker state machine.
    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    /// Queries availability for the given SKUs under the resilience policy.
    ///
    /// Transient failures are retried with exponential backoff for as long
    /// as the breaker keeps admitting calls; retries stop the moment it
    /// opens. Dropping the returned future abandons any in-flight retry.
    #[tracing::instrument(skip(self, sku_codes), fields(sku_count = sku_codes.len()))]
    pub async fn check_stock(&self, sku_codes: &[SkuCode]) -> GuardedInventory {
        let mut attempts = 0u32;

        loop {
            if !self.breaker.admit() {
                metrics::counter!("inventory_calls_short_circuited_total").increment(1);
                tracing::warn!("inventory call short-circuited, breaker open");
                return GuardedInventory::Degraded(DegradeReason::CircuitOpen);
            }

            attempts += 1;
            match self.attempt(sku_codes).await {
                Ok(snapshot) => {
                    self.breaker.record_success();
                    return GuardedInventory::Fresh(snapshot);
                }
                Err(err) => {
                    self.breaker.record_failure();
                    tracing::warn!(attempt = attempts, error = %err, "inventory call failed");

                    if !err.is_transient() || attempts >= self.config.retry.max_attempts {
                        metrics::counter!("inventory_calls_degraded_total").increment(1);
                        return GuardedInventory::Degraded(DegradeReason::AttemptsExhausted {
                            attempts,
                            last_error: err,
                        });
                    }
                }
            }

            tokio::time::sleep(self.config.retry.delay_for(attempts)).await;
        }
    }

    async fn attempt(&self, sku_codes: &[SkuCode]) -> Result<InventorySnapshot, InventoryError> {
        match tokio::time::timeout(self.config.call_timeout, self.client.check_stock(sku_codes))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(InventoryError::Timeout),
        }
    }
}
