use async_trait::async_trait;
use domain::{NewOrder, Order};

use crate::Result;

/// Core trait for order persistence implementations.
///
/// `save` is atomic: the order and all of its line items are committed
/// together or not at all, and the store assigns the order's identity and
/// creation timestamp. Uniqueness comes from the generated identifiers;
/// no caller-side locking is expected. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Commits a draft order, returning the stored record.
    async fn save(&self, order: NewOrder) -> Result<Order>;

    /// Returns every stored order, oldest first, line items in request order.
    async fn find_all(&self) -> Result<Vec<Order>>;
}
