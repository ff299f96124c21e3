//! End-to-end tests for the placement core over in-memory collaborators.

use std::time::Duration;

use domain::{LineItem, SkuCode};
use order_store::{InMemoryOrderStore, OrderStore};
use placement::{
    BreakerConfig, CircuitState, Disposition, GuardConfig, InMemoryEventPublisher,
    InMemoryInventoryClient, InventoryError, InventoryGuard, PlacementOrchestrator, RetryConfig,
};

fn orchestrator_with(
    config: GuardConfig,
) -> (
    PlacementOrchestrator<InMemoryOrderStore, InMemoryInventoryClient, InMemoryEventPublisher>,
    InMemoryOrderStore,
    InMemoryInventoryClient,
    InMemoryEventPublisher,
) {
    let store = InMemoryOrderStore::new();
    let inventory = InMemoryInventoryClient::new();
    let publisher = InMemoryEventPublisher::new();

    let guard = InventoryGuard::new(inventory.clone(), config);
    let orchestrator = PlacementOrchestrator::new(store.clone(), guard, publisher.clone());

    (orchestrator, store, inventory, publisher)
}

fn fast_config() -> GuardConfig {
    GuardConfig {
        breaker: BreakerConfig {
            failure_threshold: 3,
            window: Duration::from_secs(60),
            cooldown: Duration::from_secs(30),
        },
        retry: RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
            multiplier: 2,
            max_delay: Duration::from_millis(100),
        },
        call_timeout: Duration::from_millis(200),
    }
}

fn items(spec: &[(&str, u32)]) -> Vec<LineItem> {
    spec.iter()
        .map(|(sku, qty)| LineItem::new(*sku, *qty))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn transient_inventory_failures_are_absorbed_by_retries() {
    let (orchestrator, store, inventory, publisher) = orchestrator_with(fast_config());
    inventory.set_level("A", 10);
    inventory.fail_next_with(InventoryError::Timeout);
    inventory.fail_next_with(InventoryError::Unreachable("refused".to_string()));

    let outcome = orchestrator.place_order(items(&[("A", 4)])).await.unwrap();

    assert_eq!(outcome.disposition, Disposition::Placed);
    assert_eq!(inventory.call_count(), 3);
    assert_eq!(store.order_count().await, 1);
    assert_eq!(publisher.published_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn repeated_failures_trip_the_breaker_and_later_orders_short_circuit() {
    let (orchestrator, store, inventory, _) = orchestrator_with(fast_config());
    inventory.set_level("A", 10);
    for _ in 0..3 {
        inventory.fail_next_with(InventoryError::Unreachable("refused".to_string()));
    }

    let first = orchestrator.place_order(items(&[("A", 1)])).await.unwrap();
    assert_eq!(first.disposition, Disposition::InventoryUnavailable);
    assert_eq!(orchestrator.guard().breaker().state(), CircuitState::Open);
    let calls_after_first = inventory.call_count();

    // Breaker is open: the next order is declined with no network attempt.
    let second = orchestrator.place_order(items(&[("A", 1)])).await.unwrap();
    assert_eq!(second.disposition, Disposition::InventoryUnavailable);
    assert_eq!(inventory.call_count(), calls_after_first);
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn breaker_recovers_after_cooldown_and_a_successful_probe() {
    let (orchestrator, store, inventory, publisher) = orchestrator_with(fast_config());
    inventory.set_level("A", 10);
    for _ in 0..3 {
        inventory.fail_next_with(InventoryError::Timeout);
    }

    let declined = orchestrator.place_order(items(&[("A", 2)])).await.unwrap();
    assert_eq!(declined.disposition, Disposition::InventoryUnavailable);
    assert_eq!(orchestrator.guard().breaker().state(), CircuitState::Open);

    tokio::time::advance(Duration::from_secs(30)).await;
    assert_eq!(
        orchestrator.guard().breaker().state(),
        CircuitState::HalfOpen
    );

    // The probe succeeds, closing the breaker and placing the order.
    let placed = orchestrator.place_order(items(&[("A", 2)])).await.unwrap();
    assert_eq!(placed.disposition, Disposition::Placed);
    assert_eq!(orchestrator.guard().breaker().state(), CircuitState::Closed);
    assert_eq!(store.order_count().await, 1);
    assert_eq!(publisher.published_count(), 1);
}

#[tokio::test]
async fn fulfilled_and_unavailable_cover_the_requested_skus() {
    let (orchestrator, _, inventory, _) = orchestrator_with(fast_config());
    inventory.set_level("A", 1);
    inventory.set_level("B", 0);
    inventory.set_level("C", 3);

    let outcome = orchestrator
        .place_order(items(&[("A", 1), ("B", 2), ("C", 3)]))
        .await
        .unwrap();

    let mut covered: Vec<SkuCode> = outcome
        .fulfilled_skus
        .iter()
        .chain(outcome.unavailable_skus.iter())
        .cloned()
        .collect();
    covered.sort();

    let mut requested = vec![SkuCode::new("A"), SkuCode::new("B"), SkuCode::new("C")];
    requested.sort();

    assert_eq!(covered, requested);
}

#[tokio::test]
async fn concurrent_placements_for_distinct_requests_are_independent() {
    let (orchestrator, store, inventory, publisher) = orchestrator_with(fast_config());
    inventory.set_level("A", 100);
    inventory.set_level("B", 100);

    let orchestrator = std::sync::Arc::new(orchestrator);
    let mut handles = Vec::new();
    for i in 0..8 {
        let orchestrator = orchestrator.clone();
        let sku = if i % 2 == 0 { "A" } else { "B" };
        handles.push(tokio::spawn(async move {
            orchestrator.place_order(items(&[(sku, 1)])).await
        }));
    }

    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome.disposition, Disposition::Placed);
    }

    let orders = store.find_all().await.unwrap();
    assert_eq!(orders.len(), 8);
    assert_eq!(publisher.published_count(), 8);

    // Every committed order carries a distinct identity.
    let mut numbers: Vec<_> = orders.iter().map(|o| o.order_number).collect();
    numbers.sort_by_key(|n| n.as_uuid());
    numbers.dedup();
    assert_eq!(numbers.len(), 8);
}

#[tokio::test(start_paused = true)]
async fn cancelled_placement_commits_nothing() {
    let (orchestrator, store, inventory, publisher) = orchestrator_with(fast_config());
    inventory.set_level("A", 10);
    inventory.set_delay(Duration::from_secs(60));

    let orchestrator = std::sync::Arc::new(orchestrator);
    let task = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.place_order(items(&[("A", 1)])).await })
    };

    // Let the placement reach the inventory call, then abandon it.
    tokio::task::yield_now().await;
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert_eq!(store.save_call_count(), 0);
    assert_eq!(publisher.published_count(), 0);
}
