//! External collaborators consumed by the orchestrator.

pub mod inventory;
pub mod publisher;

pub use inventory::{HttpInventoryClient, InMemoryInventoryClient, InventoryClient, InventoryError};
pub use publisher::{EventPublisher, InMemoryEventPublisher, KafkaEventPublisher, PublishError};
