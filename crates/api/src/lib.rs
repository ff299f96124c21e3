//! HTTP API server with observability for the order placement services.
//!
//! Provides REST endpoints for placing and listing orders, with structured
//! logging (tracing) and Prometheus metrics. The surface is deliberately
//! thin; the orchestration core lives in the `placement` crate.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{InMemoryOrderStore, OrderStore};
use placement::{
    EventPublisher, GuardConfig, InMemoryEventPublisher, InMemoryInventoryClient, InventoryClient,
    InventoryGuard, PlacementOrchestrator,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, C, P>(state: Arc<AppState<S, C, P>>, metrics_handle: PrometheusHandle) -> Router
where
    S: OrderStore + 'static,
    C: InventoryClient + 'static,
    P: EventPublisher + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::place::<S, C, P>))
        .route("/orders", get(routes::orders::list::<S, C, P>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Builds application state wired over the given collaborators.
pub fn create_state<S, C, P>(
    store: S,
    inventory: C,
    publisher: P,
    guard_config: GuardConfig,
) -> Arc<AppState<S, C, P>>
where
    S: OrderStore + Clone + 'static,
    C: InventoryClient + 'static,
    P: EventPublisher + 'static,
{
    let guard = InventoryGuard::new(inventory, guard_config);
    let orchestrator = PlacementOrchestrator::new(store.clone(), guard, publisher);
    Arc::new(AppState {
        orchestrator,
        store,
    })
}

/// Builds application state over in-memory collaborators.
///
/// Used by tests and by the binary when no database is configured.
pub fn create_in_memory_state(
    inventory: InMemoryInventoryClient,
    publisher: InMemoryEventPublisher,
    guard_config: GuardConfig,
) -> Arc<AppState<InMemoryOrderStore, InMemoryInventoryClient, InMemoryEventPublisher>> {
    create_state(InMemoryOrderStore::new(), inventory, publisher, guard_config)
}
