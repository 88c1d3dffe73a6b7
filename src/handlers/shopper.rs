use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    errors::ServiceError,
    handlers::{parse_item_id, parse_store_id},
    services::orders::PlaceOrderRequest,
    services::requests::CreateItemRequestBody,
    ApiResponse, AppState, ListQuery,
};

/// List stores visible to shoppers
#[utoipa::path(
    get,
    path = "/web/stores",
    params(ListQuery),
    responses(
        (status = 200, description = "Store list returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "shopper"
)]
pub async fn list_stores(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = state
        .services
        .stores
        .list_stores(query.limit, query.page)
        .await?;
    Ok(Json(ApiResponse::listing(
        page.records,
        page.count,
        "Stores fetched successfully",
    )))
}

/// Store detail with its live inventory
#[utoipa::path(
    get,
    path = "/web/stores/{store_id}",
    params(("store_id" = String, Path, description = "Store id")),
    responses(
        (status = 200, description = "Store detail returned"),
        (status = 400, description = "Unknown store", body = crate::errors::ErrorResponse)
    ),
    tag = "shopper"
)]
pub async fn store_details(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let store_id = parse_store_id(&store_id)?;
    let details = state.services.stores.store_details(store_id).await?;
    Ok(Json(ApiResponse::success(
        details,
        "Store fetched successfully",
    )))
}

/// Paginated inventory listing for one store
#[utoipa::path(
    get,
    path = "/web/stores/{store_id}/items",
    params(("store_id" = String, Path, description = "Store id"), ListQuery),
    responses(
        (status = 200, description = "Inventory returned"),
        (status = 400, description = "Unknown store", body = crate::errors::ErrorResponse)
    ),
    tag = "shopper"
)]
pub async fn store_inventory(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let store_id = parse_store_id(&store_id)?;
    let page = state
        .services
        .items
        .list_items(store_id, query.limit, query.page)
        .await?;
    Ok(Json(ApiResponse::listing(
        page.records,
        page.count,
        "Items fetched successfully",
    )))
}

/// Item detail with its owning store
#[utoipa::path(
    get,
    path = "/web/stores/{store_id}/items/{item_id}",
    params(
        ("store_id" = String, Path, description = "Store id"),
        ("item_id" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item detail returned"),
        (status = 400, description = "Unknown store or item", body = crate::errors::ErrorResponse)
    ),
    tag = "shopper"
)]
pub async fn item_details(
    State(state): State<AppState>,
    Path((store_id, item_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServiceError> {
    let store_id = parse_store_id(&store_id)?;
    let item_id = parse_item_id(&item_id)?;
    let details = state.services.items.item_details(store_id, item_id).await?;
    Ok(Json(ApiResponse::success(
        details,
        "Item fetched successfully",
    )))
}

/// Place a pickup order
#[utoipa::path(
    post,
    path = "/web/stores/{store_id}/orders",
    params(("store_id" = String, Path, description = "Store id")),
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Order placed"),
        (status = 400, description = "Invalid cart or insufficient stock", body = crate::errors::ErrorResponse)
    ),
    tag = "shopper"
)]
pub async fn place_order(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let store_id = parse_store_id(&store_id)?;
    let placed = state.services.orders.place_order(store_id, request).await?;
    let order = placed.order.clone();

    // Respond first; the mail fan-out runs detached and never affects the
    // order's persisted state.
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        notifier.send_order_notifications(&placed).await;
    });

    info!(order_no = %order.order_no, "order response sent");
    Ok(Json(ApiResponse::success(
        order,
        "Order placed successfully",
    )))
}

/// Request an item the store does not carry
#[utoipa::path(
    post,
    path = "/web/stores/{store_id}/requests",
    params(("store_id" = String, Path, description = "Store id")),
    request_body = CreateItemRequestBody,
    responses(
        (status = 200, description = "Request recorded"),
        (status = 400, description = "Unknown store", body = crate::errors::ErrorResponse)
    ),
    tag = "shopper"
)]
pub async fn request_item(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Json(request): Json<CreateItemRequestBody>,
) -> Result<impl IntoResponse, ServiceError> {
    let store_id = parse_store_id(&store_id)?;
    let created = state
        .services
        .requests
        .create_request(store_id, request)
        .await?;
    Ok(Json(ApiResponse::success(
        created,
        "Request recorded successfully",
    )))
}
