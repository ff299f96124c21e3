//! Domain error types.

use thiserror::Error;

use crate::sku::SkuCode;

/// Rejections raised while validating an inbound order request.
///
/// Validation happens before any network or storage call, so a request
/// that fails here never touches the inventory service or the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The request contains no line items.
    #[error("order request contains no line items")]
    Empty,

    /// A line item has an empty or whitespace-only SKU code.
    #[error("line item has a blank SKU code")]
    BlankSku,

    /// A line item requested a quantity of zero.
    #[error("requested quantity for SKU {sku_code} must be positive")]
    ZeroQuantity { sku_code: SkuCode },

    /// Merging duplicate lines for a SKU overflowed the quantity.
    #[error("combined quantity for SKU {sku_code} is out of range")]
    QuantityOverflow { sku_code: SkuCode },
}

/// Hard failures from the fulfillment evaluator.
///
/// Both variants mean the catalog and the request disagree, which rejects
/// the order outright. They are deliberately distinct from "zero stock",
/// which is partial-fulfillment-eligible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The inventory answer does not cover a requested SKU.
    #[error("SKU {sku_code} not found in inventory")]
    SkuNotFound { sku_code: SkuCode },

    /// Stock exists for the SKU but cannot cover the requested quantity.
    #[error("inventory for SKU {sku_code} is {available}, requested {requested}")]
    InsufficientQuantity {
        sku_code: SkuCode,
        requested: u32,
        available: u32,
    },
}
