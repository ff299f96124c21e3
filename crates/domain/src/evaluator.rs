//! Pure decision logic for how much of a request can be fulfilled.

use crate::error::EvaluationError;
use crate::fulfillment::FulfillmentResult;
use crate::request::OrderRequest;
use crate::snapshot::InventorySnapshot;

/// Classifies a request against an inventory snapshot.
///
/// Deterministic and free of I/O: the same `(request, snapshot)` pair
/// always produces the same result. Works on the request's consolidated
/// line items, so duplicate SKUs have already been merged.
///
/// Hard failures are distinct from stock exhaustion: a SKU missing from
/// the snapshot means the inventory answer is inconsistent with the
/// catalog, and requesting more than a nonzero stock level rejects the
/// order rather than shrinking it.
pub fn evaluate(
    request: &OrderRequest,
    snapshot: &InventorySnapshot,
) -> Result<FulfillmentResult, EvaluationError> {
    let mut fulfillable = Vec::with_capacity(request.len());
    let mut unavailable = Vec::new();

    for item in request.items() {
        let available =
            snapshot
                .available(&item.sku_code)
                .ok_or_else(|| EvaluationError::SkuNotFound {
                    sku_code: item.sku_code.clone(),
                })?;

        if available == 0 {
            unavailable.push(item.sku_code.clone());
        } else if item.quantity > available {
            return Err(EvaluationError::InsufficientQuantity {
                sku_code: item.sku_code.clone(),
                requested: item.quantity,
                available,
            });
        } else {
            fulfillable.push(item.clone());
        }
    }

    if unavailable.is_empty() {
        Ok(FulfillmentResult::Full { fulfillable })
    } else if fulfillable.is_empty() {
        Ok(FulfillmentResult::None { unavailable })
    } else {
        Ok(FulfillmentResult::Partial {
            fulfillable,
            unavailable,
        })
    }
}
