//! Outcome of evaluating a request against an inventory snapshot.

use crate::request::LineItem;
use crate::sku::SkuCode;

/// How much of a request can be shipped.
///
/// Invariants upheld by the evaluator: fulfillable quantities never exceed
/// the snapshot's availability at evaluation time, and the fulfillable and
/// unavailable SKU sets together cover exactly the requested set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentResult {
    /// Every requested line can ship at its full quantity.
    Full { fulfillable: Vec<LineItem> },

    /// Some lines can ship; the rest are out of stock.
    Partial {
        fulfillable: Vec<LineItem>,
        unavailable: Vec<SkuCode>,
    },

    /// Every requested SKU is out of stock.
    None { unavailable: Vec<SkuCode> },
}

impl FulfillmentResult {
    /// Line items that can ship at their full requested quantity.
    pub fn fulfillable_items(&self) -> &[LineItem] {
        match self {
            Self::Full { fulfillable } | Self::Partial { fulfillable, .. } => fulfillable,
            Self::None { .. } => &[],
        }
    }

    /// SKUs that are out of stock.
    pub fn unavailable_skus(&self) -> &[SkuCode] {
        match self {
            Self::Full { .. } => &[],
            Self::Partial { unavailable, .. } | Self::None { unavailable } => unavailable,
        }
    }
}
