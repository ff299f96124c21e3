//! Caller-visible outcome of an order placement.

use common::OrderNumber;
use domain::SkuCode;
use serde::Serialize;

/// Broad classification of what happened to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Disposition {
    /// Every requested line was persisted.
    Placed,
    /// Only the in-stock subset was persisted.
    PartiallyPlaced,
    /// Every requested SKU was out of stock; nothing was persisted.
    AllOutOfStock,
    /// Inventory could not be consulted; the order was declined.
    InventoryUnavailable,
}

/// Structured result returned to the caller after orchestration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementOutcome {
    pub disposition: Disposition,
    /// Present exactly when an order record was committed.
    pub order_number: Option<OrderNumber>,
    pub fulfilled_skus: Vec<SkuCode>,
    pub unavailable_skus: Vec<SkuCode>,
}

impl PlacementOutcome {
    /// Whether an order record was committed.
    pub fn placed(&self) -> bool {
        matches!(
            self.disposition,
            Disposition::Placed | Disposition::PartiallyPlaced
        )
    }
}
