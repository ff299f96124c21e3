//! Order placement and listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use domain::LineItem;
use order_store::OrderStore;
use placement::{
    Disposition, EventPublisher, InventoryClient, PlacementOrchestrator, PlacementOutcome,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore, C: InventoryClient, P: EventPublisher> {
    pub orchestrator: PlacementOrchestrator<S, C, P>,
    pub store: S,
}

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub items: Vec<LineItemRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub sku_code: String,
    pub quantity: u32,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub disposition: Disposition,
    pub placed: bool,
    pub order_number: Option<String>,
    pub fulfilled_skus: Vec<String>,
    pub unavailable_skus: Vec<String>,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub order_number: String,
    pub line_items: Vec<LineItemResponse>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemResponse {
    pub sku_code: String,
    pub quantity: u32,
}

// -- Handlers --

/// POST /orders — run the placement orchestration for the request.
#[tracing::instrument(skip(state, req))]
pub async fn place<S, C, P>(
    State(state): State<Arc<AppState<S, C, P>>>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), ApiError>
where
    S: OrderStore + 'static,
    C: InventoryClient + 'static,
    P: EventPublisher + 'static,
{
    let items: Vec<LineItem> = req
        .items
        .into_iter()
        .map(|item| LineItem::new(item.sku_code, item.quantity))
        .collect();

    let outcome = state.orchestrator.place_order(items).await?;

    let status = if outcome.placed() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let message = message_for(&outcome);

    Ok((
        status,
        Json(PlaceOrderResponse {
            disposition: outcome.disposition,
            placed: outcome.placed(),
            order_number: outcome.order_number.map(|number| number.to_string()),
            fulfilled_skus: outcome
                .fulfilled_skus
                .iter()
                .map(ToString::to_string)
                .collect(),
            unavailable_skus: outcome
                .unavailable_skus
                .iter()
                .map(ToString::to_string)
                .collect(),
            message,
        }),
    ))
}

/// GET /orders — list every committed order.
#[tracing::instrument(skip(state))]
pub async fn list<S, C, P>(
    State(state): State<Arc<AppState<S, C, P>>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError>
where
    S: OrderStore + 'static,
    C: InventoryClient + 'static,
    P: EventPublisher + 'static,
{
    let orders = state
        .store
        .find_all()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let responses = orders
        .into_iter()
        .map(|order| OrderResponse {
            id: order.id.as_i64(),
            order_number: order.order_number.to_string(),
            line_items: order
                .line_items
                .into_iter()
                .map(|item| LineItemResponse {
                    sku_code: item.sku_code.to_string(),
                    quantity: item.quantity,
                })
                .collect(),
            created_at: order.created_at,
        })
        .collect();

    Ok(Json(responses))
}

fn message_for(outcome: &PlacementOutcome) -> String {
    match outcome.disposition {
        Disposition::Placed => "Order placed".to_string(),
        Disposition::PartiallyPlaced => format!(
            "Partial order placed; out of stock: {}",
            join_skus(&outcome.unavailable_skus)
        ),
        Disposition::AllOutOfStock => format!(
            "All items out of stock: {}",
            join_skus(&outcome.unavailable_skus)
        ),
        Disposition::InventoryUnavailable => {
            "Inventory unavailable, please try again later".to_string()
        }
    }
}

fn join_skus(skus: &[domain::SkuCode]) -> String {
    skus.iter()
        .map(|sku| sku.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
