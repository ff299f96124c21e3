//! Placement error types.

use domain::{EvaluationError, ValidationError};
use order_store::OrderStoreError;
use thiserror::Error;

/// Failures surfaced to the caller of `place_order`.
///
/// Degraded inventory and out-of-stock results are not errors; they are
/// ordinary [`crate::PlacementOutcome`] values. Event publish failures are
/// logged and never surfaced: the committed order is authoritative.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// The request was malformed; nothing downstream was touched.
    #[error("invalid order request: {0}")]
    Validation(#[from] ValidationError),

    /// The inventory answer was inconsistent with the catalog or request.
    #[error("catalog inconsistency: {0}")]
    Catalog(#[from] EvaluationError),

    /// The order could not be committed.
    #[error("order persistence failed: {0}")]
    Store(#[from] OrderStoreError),
}
