//! Order placement orchestration.

use domain::{
    FulfillmentEvent, FulfillmentResult, LineItem, NewOrder, OrderRequest, SkuCode, evaluate,
};
use order_store::OrderStore;

use crate::error::PlacementError;
use crate::guard::{GuardedInventory, InventoryGuard};
use crate::outcome::{Disposition, PlacementOutcome};
use crate::services::inventory::InventoryClient;
use crate::services::publisher::EventPublisher;

/// Drives a single order placement end to end.
///
/// Composes the guarded inventory lookup, the fulfillment evaluator, order
/// persistence, and event emission. Each call is independent: concurrent
/// placements share no mutable state beyond the external stores, and two
/// orders racing for the same stock may both succeed; inventory authority
/// lives in the inventory service, not here.
pub struct PlacementOrchestrator<S, C, P> {
    store: S,
    guard: InventoryGuard<C>,
    publisher: P,
}

impl<S, C, P> PlacementOrchestrator<S, C, P>
where
    S: OrderStore,
    C: InventoryClient,
    P: EventPublisher,
{
    /// Creates a new orchestrator over the given collaborators.
    pub fn new(store: S, guard: InventoryGuard<C>, publisher: P) -> Self {
        Self {
            store,
            guard,
            publisher,
        }
    }

    /// Handle to the inventory guard, exposing breaker state.
    pub fn guard(&self) -> &InventoryGuard<C> {
        &self.guard
    }

    /// Places an order for the requested line items.
    ///
    /// Malformed requests are rejected before any network or storage call.
    /// A degraded inventory answer declines the order rather than guessing
    /// availability. An order record is committed only for full or partial
    /// fulfillment, and the fulfillment event is emitted only after the
    /// commit; emission failure leaves the outcome untouched.
    #[tracing::instrument(skip(self, items))]
    pub async fn place_order(
        &self,
        items: Vec<LineItem>,
    ) -> Result<PlacementOutcome, PlacementError> {
        metrics::counter!("placements_attempted_total").increment(1);
        let started = std::time::Instant::now();

        let request = OrderRequest::new(items)?;
        let sku_codes = request.sku_codes();

        let snapshot = match self.guard.check_stock(&sku_codes).await {
            GuardedInventory::Fresh(snapshot) => snapshot,
            GuardedInventory::Degraded(reason) => {
                metrics::counter!("placements_declined_total").increment(1);
                tracing::warn!(%reason, "declining order, inventory unavailable");
                metrics::histogram!("placement_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                return Ok(PlacementOutcome {
                    disposition: Disposition::InventoryUnavailable,
                    order_number: None,
                    fulfilled_skus: Vec::new(),
                    unavailable_skus: sku_codes,
                });
            }
        };

        let outcome = match evaluate(&request, &snapshot)? {
            FulfillmentResult::None { unavailable } => {
                tracing::info!(skus = ?unavailable, "all requested items out of stock");
                PlacementOutcome {
                    disposition: Disposition::AllOutOfStock,
                    order_number: None,
                    fulfilled_skus: Vec::new(),
                    unavailable_skus: unavailable,
                }
            }
            FulfillmentResult::Full { fulfillable } => {
                self.commit(fulfillable, Vec::new(), Disposition::Placed)
                    .await?
            }
            FulfillmentResult::Partial {
                fulfillable,
                unavailable,
            } => {
                self.commit(fulfillable, unavailable, Disposition::PartiallyPlaced)
                    .await?
            }
        };

        metrics::histogram!("placement_duration_seconds").record(started.elapsed().as_secs_f64());
        Ok(outcome)
    }

    async fn commit(
        &self,
        fulfillable: Vec<LineItem>,
        unavailable: Vec<SkuCode>,
        disposition: Disposition,
    ) -> Result<PlacementOutcome, PlacementError> {
        let draft = NewOrder::new(fulfillable);
        let order = self.store.save(draft).await?;

        let event = FulfillmentEvent::for_order(&order);
        if let Err(err) = self.publisher.publish(&event).await {
            // The order is committed and authoritative; delivery is best effort.
            tracing::error!(
                order_number = %order.order_number,
                error = %err,
                "fulfillment event publish failed"
            );
        }

        metrics::counter!("orders_placed_total").increment(1);
        tracing::info!(order_number = %order.order_number, ?disposition, "order placed");

        Ok(PlacementOutcome {
            disposition,
            order_number: Some(order.order_number),
            fulfilled_skus: order
                .line_items
                .iter()
                .map(|item| item.sku_code.clone())
                .collect(),
            unavailable_skus: unavailable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::GuardConfig;
    use crate::services::inventory::{InMemoryInventoryClient, InventoryError};
    use crate::services::publisher::InMemoryEventPublisher;
    use domain::{EvaluationError, ValidationError};
    use order_store::InMemoryOrderStore;

    fn setup() -> (
        PlacementOrchestrator<InMemoryOrderStore, InMemoryInventoryClient, InMemoryEventPublisher>,
        InMemoryOrderStore,
        InMemoryInventoryClient,
        InMemoryEventPublisher,
    ) {
        let store = InMemoryOrderStore::new();
        let inventory = InMemoryInventoryClient::new();
        let publisher = InMemoryEventPublisher::new();

        let guard = InventoryGuard::new(inventory.clone(), GuardConfig::default());
        let orchestrator = PlacementOrchestrator::new(store.clone(), guard, publisher.clone());

        (orchestrator, store, inventory, publisher)
    }

    fn items(spec: &[(&str, u32)]) -> Vec<LineItem> {
        spec.iter()
            .map(|(sku, qty)| LineItem::new(*sku, *qty))
            .collect()
    }

    #[tokio::test]
    async fn full_fulfillment_persists_everything_and_emits() {
        let (orchestrator, store, inventory, publisher) = setup();
        inventory.set_level("A", 5);
        inventory.set_level("B", 2);

        let outcome = orchestrator
            .place_order(items(&[("A", 2), ("B", 2)]))
            .await
            .unwrap();

        assert_eq!(outcome.disposition, Disposition::Placed);
        assert!(outcome.placed());
        assert!(outcome.order_number.is_some());
        assert_eq!(outcome.fulfilled_skus, vec![SkuCode::new("A"), SkuCode::new("B")]);
        assert!(outcome.unavailable_skus.is_empty());

        let orders = store.find_all().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].line_items, items(&[("A", 2), ("B", 2)]));
        assert_eq!(orders[0].order_number, outcome.order_number.unwrap());

        let events = publisher.published();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].order_number, orders[0].order_number);
        assert_eq!(events[0].order_id, orders[0].id);
        assert_eq!(events[0].line_items, orders[0].line_items);
    }

    #[tokio::test]
    async fn partial_fulfillment_persists_only_in_stock_lines() {
        let (orchestrator, store, inventory, publisher) = setup();
        inventory.set_level("A", 5);
        inventory.set_level("B", 0);
        inventory.set_level("C", 3);

        let outcome = orchestrator
            .place_order(items(&[("A", 2), ("B", 1), ("C", 3)]))
            .await
            .unwrap();

        assert_eq!(outcome.disposition, Disposition::PartiallyPlaced);
        assert_eq!(outcome.fulfilled_skus, vec![SkuCode::new("A"), SkuCode::new("C")]);
        assert_eq!(outcome.unavailable_skus, vec![SkuCode::new("B")]);

        let orders = store.find_all().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].line_items, items(&[("A", 2), ("C", 3)]));
        assert_eq!(publisher.published_count(), 1);
    }

    #[tokio::test]
    async fn all_out_of_stock_persists_and_emits_nothing() {
        let (orchestrator, store, inventory, publisher) = setup();
        inventory.set_level("A", 0);
        inventory.set_level("B", 0);

        let outcome = orchestrator
            .place_order(items(&[("A", 1), ("B", 1)]))
            .await
            .unwrap();

        assert_eq!(outcome.disposition, Disposition::AllOutOfStock);
        assert!(!outcome.placed());
        assert!(outcome.order_number.is_none());
        assert_eq!(outcome.unavailable_skus, vec![SkuCode::new("A"), SkuCode::new("B")]);

        assert_eq!(store.order_count().await, 0);
        assert_eq!(publisher.published_count(), 0);
    }

    #[tokio::test]
    async fn empty_request_is_rejected_before_any_call() {
        let (orchestrator, store, inventory, publisher) = setup();

        let result = orchestrator.place_order(vec![]).await;

        assert!(matches!(
            result,
            Err(PlacementError::Validation(ValidationError::Empty))
        ));
        assert_eq!(inventory.call_count(), 0);
        assert_eq!(store.save_call_count(), 0);
        assert_eq!(publisher.published_count(), 0);
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected_before_any_call() {
        let (orchestrator, _, inventory, _) = setup();

        let result = orchestrator.place_order(items(&[("A", 0)])).await;

        assert!(matches!(
            result,
            Err(PlacementError::Validation(ValidationError::ZeroQuantity { .. }))
        ));
        assert_eq!(inventory.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_sku_rejects_without_persisting() {
        let (orchestrator, store, inventory, publisher) = setup();
        inventory.set_level("A", 5);

        let result = orchestrator.place_order(items(&[("A", 1), ("GHOST", 1)])).await;

        assert!(matches!(
            result,
            Err(PlacementError::Catalog(EvaluationError::SkuNotFound { .. }))
        ));
        assert_eq!(store.save_call_count(), 0);
        assert_eq!(publisher.published_count(), 0);
    }

    #[tokio::test]
    async fn insufficient_quantity_rejects_without_persisting() {
        let (orchestrator, store, inventory, publisher) = setup();
        inventory.set_level("A", 5);

        let result = orchestrator.place_order(items(&[("A", 6)])).await;

        assert!(matches!(
            result,
            Err(PlacementError::Catalog(
                EvaluationError::InsufficientQuantity { .. }
            ))
        ));
        assert_eq!(store.save_call_count(), 0);
        assert_eq!(publisher.published_count(), 0);
    }

    #[tokio::test]
    async fn pre_tripped_breaker_declines_without_touching_the_store() {
        let (orchestrator, store, inventory, publisher) = setup();
        inventory.set_level("A", 5);
        orchestrator.guard().breaker().trip();

        let outcome = orchestrator.place_order(items(&[("A", 1)])).await.unwrap();

        assert_eq!(outcome.disposition, Disposition::InventoryUnavailable);
        assert!(!outcome.placed());
        assert_eq!(outcome.unavailable_skus, vec![SkuCode::new("A")]);

        assert_eq!(inventory.call_count(), 0);
        assert_eq!(store.save_call_count(), 0);
        assert_eq!(publisher.published_count(), 0);
    }

    #[tokio::test]
    async fn publish_failure_does_not_fail_the_placement() {
        let (orchestrator, store, inventory, publisher) = setup();
        inventory.set_level("A", 5);
        publisher.set_fail_on_publish(true);

        let outcome = orchestrator.place_order(items(&[("A", 2)])).await.unwrap();

        assert_eq!(outcome.disposition, Disposition::Placed);
        assert_eq!(store.order_count().await, 1);
        assert_eq!(publisher.published_count(), 0);
    }

    #[tokio::test]
    async fn store_failure_surfaces_and_emits_nothing() {
        let (orchestrator, store, inventory, publisher) = setup();
        inventory.set_level("A", 5);
        store.set_fail_on_save(true);

        let result = orchestrator.place_order(items(&[("A", 2)])).await;

        assert!(matches!(result, Err(PlacementError::Store(_))));
        assert_eq!(publisher.published_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_skus_are_merged_before_evaluation() {
        let (orchestrator, store, inventory, _) = setup();
        inventory.set_level("A", 5);

        let outcome = orchestrator
            .place_order(items(&[("A", 2), ("A", 3)]))
            .await
            .unwrap();

        assert_eq!(outcome.disposition, Disposition::Placed);

        let orders = store.find_all().await.unwrap();
        assert_eq!(orders[0].line_items, items(&[("A", 5)]));
    }

    #[tokio::test]
    async fn degraded_after_exhausted_retries_declines_the_order() {
        let (orchestrator, store, inventory, publisher) = setup();
        inventory.set_level("A", 5);
        inventory.fail_next_with(InventoryError::BadResponse("garbage".to_string()));

        let outcome = orchestrator.place_order(items(&[("A", 1)])).await.unwrap();

        assert_eq!(outcome.disposition, Disposition::InventoryUnavailable);
        assert_eq!(store.save_call_count(), 0);
        assert_eq!(publisher.published_count(), 0);
    }
}
