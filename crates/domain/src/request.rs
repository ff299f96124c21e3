//! Validated order requests and their line items.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::sku::SkuCode;

/// A single requested product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub sku_code: SkuCode,
    pub quantity: u32,
}

impl LineItem {
    /// Creates a line item.
    pub fn new(sku_code: impl Into<SkuCode>, quantity: u32) -> Self {
        Self {
            sku_code: sku_code.into(),
            quantity,
        }
    }
}

/// A customer's requested line items, validated and consolidated.
///
/// Construction enforces the request invariants: at least one line item,
/// non-blank SKU codes, strictly positive quantities. Duplicate SKUs are
/// merged by summing their quantities, preserving first-seen order, since
/// inventory is tracked per SKU rather than per line. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    items: Vec<LineItem>,
}

impl OrderRequest {
    /// Validates and consolidates the requested line items.
    pub fn new(items: Vec<LineItem>) -> Result<Self, ValidationError> {
        if items.is_empty() {
            return Err(ValidationError::Empty);
        }

        for item in &items {
            if item.sku_code.as_str().trim().is_empty() {
                return Err(ValidationError::BlankSku);
            }
            if item.quantity == 0 {
                return Err(ValidationError::ZeroQuantity {
                    sku_code: item.sku_code.clone(),
                });
            }
        }

        let mut merged: Vec<LineItem> = Vec::with_capacity(items.len());
        for item in items {
            match merged.iter_mut().find(|m| m.sku_code == item.sku_code) {
                Some(existing) => {
                    existing.quantity = existing.quantity.checked_add(item.quantity).ok_or(
                        ValidationError::QuantityOverflow {
                            sku_code: item.sku_code,
                        },
                    )?;
                }
                None => merged.push(item),
            }
        }

        Ok(Self { items: merged })
    }

    /// Line items with duplicate SKUs already consolidated, in request order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The distinct SKU codes, in request order.
    pub fn sku_codes(&self) -> Vec<SkuCode> {
        self.items.iter().map(|item| item.sku_code.clone()).collect()
    }

    /// Number of distinct SKUs in the request.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: empty requests cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_request() {
        assert_eq!(OrderRequest::new(vec![]), Err(ValidationError::Empty));
    }

    #[test]
    fn rejects_blank_sku() {
        let result = OrderRequest::new(vec![LineItem::new("  ", 1)]);
        assert_eq!(result, Err(ValidationError::BlankSku));
    }

    #[test]
    fn rejects_zero_quantity() {
        let result = OrderRequest::new(vec![LineItem::new("SKU-001", 0)]);
        assert!(matches!(
            result,
            Err(ValidationError::ZeroQuantity { sku_code }) if sku_code.as_str() == "SKU-001"
        ));
    }

    #[test]
    fn merges_duplicate_skus_summing_quantities() {
        let request = OrderRequest::new(vec![
            LineItem::new("A", 2),
            LineItem::new("B", 1),
            LineItem::new("A", 3),
        ])
        .unwrap();

        assert_eq!(
            request.items(),
            &[LineItem::new("A", 5), LineItem::new("B", 1)]
        );
    }

    #[test]
    fn preserves_first_seen_order_when_merging() {
        let request = OrderRequest::new(vec![
            LineItem::new("C", 1),
            LineItem::new("A", 1),
            LineItem::new("C", 1),
            LineItem::new("B", 1),
        ])
        .unwrap();

        let skus: Vec<&str> = request.items().iter().map(|i| i.sku_code.as_str()).collect();
        assert_eq!(skus, vec!["C", "A", "B"]);
    }

    #[test]
    fn merge_overflow_is_rejected() {
        let result = OrderRequest::new(vec![
            LineItem::new("A", u32::MAX),
            LineItem::new("A", 1),
        ]);
        assert!(matches!(
            result,
            Err(ValidationError::QuantityOverflow { .. })
        ));
    }
}
