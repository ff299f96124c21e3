//! Fulfillment event publisher: trait, Kafka producer, in-memory double.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use domain::FulfillmentEvent;
use rdkafka::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use thiserror::Error;

/// Errors raised while handing an event to the broker.
///
/// These never propagate past the orchestrator; the committed order is
/// authoritative regardless of delivery.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The event could not be serialized.
    #[error("failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The publisher refused the event.
    #[error("publisher unavailable: {0}")]
    Unavailable(String),
}

/// Publishes one fulfillment event per committed order.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Hands the event to the broker.
    ///
    /// Implementations must not await broker acknowledgment; delivery
    /// outcomes are logged from a completion task instead.
    async fn publish(&self, event: &FulfillmentEvent) -> Result<(), PublishError>;
}

/// Kafka-backed publisher for fulfillment events.
#[derive(Clone)]
pub struct KafkaEventPublisher {
    producer: FutureProducer,
    topic: String,
}

impl KafkaEventPublisher {
    /// Creates a producer against `brokers`, publishing to `topic`.
    pub fn new(
        brokers: &str,
        topic: impl Into<String>,
    ) -> Result<Self, rdkafka::error::KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self {
            producer,
            topic: topic.into(),
        })
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish(&self, event: &FulfillmentEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(event)?;
        let key = event.order_number.to_string();
        let order_number = event.order_number;

        let producer = self.producer.clone();
        let topic = self.topic.clone();

        // Delivery is awaited off the request path; the order is already
        // committed and the caller's outcome cannot change.
        tokio::spawn(async move {
            let record = FutureRecord::to(&topic).key(&key).payload(&payload);
            match producer.send(record, Duration::from_secs(5)).await {
                Ok((partition, offset)) => {
                    tracing::info!(
                        %order_number,
                        partition,
                        offset,
                        "fulfillment event acknowledged"
                    );
                }
                Err((err, _)) => {
                    tracing::error!(
                        %order_number,
                        error = %err,
                        "fulfillment event delivery failed"
                    );
                }
            }
        });

        Ok(())
    }
}

/// In-memory publisher for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventPublisher {
    events: Arc<Mutex<Vec<FulfillmentEvent>>>,
    fail_on_publish: Arc<AtomicBool>,
}

impl InMemoryEventPublisher {
    /// Creates a new in-memory publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the publisher to reject subsequent events.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.fail_on_publish.store(fail, Ordering::SeqCst);
    }

    /// Events published so far, in order.
    pub fn published(&self) -> Vec<FulfillmentEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Number of events published so far.
    pub fn published_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: &FulfillmentEvent) -> Result<(), PublishError> {
        if self.fail_on_publish.load(Ordering::SeqCst) {
            return Err(PublishError::Unavailable("publish rejected".to_string()));
        }

        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
