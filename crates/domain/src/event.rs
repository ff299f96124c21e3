//! Fulfillment event published after an order is committed.

use chrono::{DateTime, Utc};
use common::{EventId, OrderId, OrderNumber};
use serde::{Deserialize, Serialize};

use crate::order::Order;
use crate::request::LineItem;

/// Notification that an order was placed and which lines will ship.
///
/// Serialized as a self-describing record; downstream consumers match on
/// the field names, so they are part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentEvent {
    pub event_id: EventId,
    pub order_id: OrderId,
    pub order_number: OrderNumber,
    pub line_items: Vec<LineItem>,
    pub order_date: DateTime<Utc>,
    pub event_timestamp: DateTime<Utc>,
}

impl FulfillmentEvent {
    /// Builds the event for a committed order, stamping a fresh event ID
    /// and the current time.
    pub fn for_order(order: &Order) -> Self {
        Self {
            event_id: EventId::new(),
            order_id: order.id,
            order_number: order.order_number,
            line_items: order.line_items.clone(),
            order_date: order.created_at,
            event_timestamp: Utc::now(),
        }
    }
}
