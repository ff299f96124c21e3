//! Persisted order entity and its unsaved draft.

use chrono::{DateTime, Utc};
use common::{OrderId, OrderNumber};
use serde::{Deserialize, Serialize};

use crate::request::LineItem;

/// An order ready to be committed, before the store has assigned identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_number: OrderNumber,
    pub line_items: Vec<LineItem>,
}

impl NewOrder {
    /// Creates a draft with a freshly generated order number.
    pub fn new(line_items: Vec<LineItem>) -> Self {
        Self {
            order_number: OrderNumber::new(),
            line_items,
        }
    }
}

/// An order as committed to durable storage.
///
/// The store assigns `id` and `created_at`; line items keep the order in
/// which they were requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub line_items: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
}
