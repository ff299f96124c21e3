use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use common::OrderId;
use domain::{NewOrder, Order};
use tokio::sync::RwLock;

use crate::error::{OrderStoreError, Result};
use crate::store::OrderStore;

/// In-memory order store for testing.
///
/// Assigns identities from an atomic counter and timestamps at commit
/// time, mirroring the PostgreSQL implementation's behavior.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
    next_id: Arc<AtomicI64>,
    save_calls: Arc<AtomicUsize>,
    fail_on_save: Arc<AtomicBool>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to reject subsequent saves.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.fail_on_save.store(fail, Ordering::SeqCst);
    }

    /// Number of times `save` was called, including rejected calls.
    pub fn save_call_count(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// Number of orders committed.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn save(&self, order: NewOrder) -> Result<Order> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_on_save.load(Ordering::SeqCst) {
            return Err(OrderStoreError::Unavailable("save rejected".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = Order {
            id: OrderId::new(id),
            order_number: order.order_number,
            line_items: order.line_items,
            created_at: Utc::now(),
        };

        self.orders.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<Order>> {
        Ok(self.orders.read().await.clone())
    }
}
