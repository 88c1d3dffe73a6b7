use axum::{
    extract::{Path, Query, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
    Json,
};
use tracing::info;

use crate::{
    auth::SESSION_COOKIE,
    errors::ServiceError,
    handlers::{parse_item_id, parse_order_id, parse_store_id},
    services::admins::{AdminProfile, CreateAdminRequest, LoginRequest},
    services::items::{CreateItemRequest, UpdateItemRequest},
    services::stores::{CreateStoreRequest, UpdateStoreRequest},
    ApiResponse, AppState, ListQuery,
};

/// Create an admin account
#[utoipa::path(
    post,
    path = "/admin/create",
    request_body = CreateAdminRequest,
    responses(
        (status = 200, description = "Admin created"),
        (status = 400, description = "Missing email or password", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn create_admin(
    State(state): State<AppState>,
    Json(request): Json<CreateAdminRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let profile = state.services.admins.create_admin(request).await?;
    Ok(Json(ApiResponse::success(
        profile,
        "Admin created successfully",
    )))
}

/// Log in. Issues a bearer token and opens a parallel cookie session.
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; token in body, session cookie set"),
        (status = 404, description = "Unknown email", body = crate::errors::ErrorResponse),
        (status = 401, description = "Wrong password", body = crate::errors::ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let admin = state.services.admins.verify_credentials(request).await?;
    let token = state.auth.generate_token(admin.id, &admin.email)?;
    let sid = state.auth.sessions.open(admin.id).await;

    info!(admin_id = %admin.id, "admin logged in");

    let cookie = format!("{}={}; HttpOnly; Path=/", SESSION_COOKIE, sid);
    let body = ApiResponse::success(AdminProfile::from(admin), "Logged in successfully")
        .with_token(token);
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(body)))
}

/// Create a store
#[utoipa::path(
    post,
    path = "/admin/stores",
    request_body = CreateStoreRequest,
    responses(
        (status = 200, description = "Store created"),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn create_store(
    State(state): State<AppState>,
    Json(request): Json<CreateStoreRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let store = state.services.stores.create_store(request).await?;
    Ok(Json(ApiResponse::success(
        store,
        "Store created successfully",
    )))
}

/// Merge-edit a store
#[utoipa::path(
    put,
    path = "/admin/stores/{store_id}",
    params(("store_id" = String, Path, description = "Store id")),
    request_body = UpdateStoreRequest,
    responses(
        (status = 200, description = "Store updated"),
        (status = 400, description = "Unknown store", body = crate::errors::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn edit_store(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Json(request): Json<UpdateStoreRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let store_id = parse_store_id(&store_id)?;
    let store = state.services.stores.edit_store(store_id, request).await?;
    Ok(Json(ApiResponse::success(
        store,
        "Store updated successfully",
    )))
}

/// Soft-delete a store
#[utoipa::path(
    delete,
    path = "/admin/stores/{store_id}",
    params(("store_id" = String, Path, description = "Store id")),
    responses(
        (status = 200, description = "Store deleted"),
        (status = 400, description = "Unknown store", body = crate::errors::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn delete_store(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let store_id = parse_store_id(&store_id)?;
    state.services.stores.delete_store(store_id).await?;
    Ok(Json(ApiResponse::<()>::message(
        "Store deleted successfully",
    )))
}

/// Create an item in a store
#[utoipa::path(
    post,
    path = "/admin/stores/{store_id}/items",
    params(("store_id" = String, Path, description = "Store id")),
    request_body = CreateItemRequest,
    responses(
        (status = 200, description = "Item created"),
        (status = 400, description = "Unknown store or bad price/quantity", body = crate::errors::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Json(request): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let store_id = parse_store_id(&store_id)?;
    let item = state.services.items.create_item(store_id, request).await?;
    Ok(Json(ApiResponse::success(
        item,
        "Item created successfully",
    )))
}

/// Merge-edit an item
#[utoipa::path(
    put,
    path = "/admin/stores/{store_id}/items/{item_id}",
    params(
        ("store_id" = String, Path, description = "Store id"),
        ("item_id" = String, Path, description = "Item id")
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated"),
        (status = 400, description = "Unknown item or bad price/quantity", body = crate::errors::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn edit_item(
    State(state): State<AppState>,
    Path((store_id, item_id)): Path<(String, String)>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let store_id = parse_store_id(&store_id)?;
    let item_id = parse_item_id(&item_id)?;
    let item = state
        .services
        .items
        .edit_item(store_id, item_id, request)
        .await?;
    Ok(Json(ApiResponse::success(
        item,
        "Item updated successfully",
    )))
}

/// Soft-delete an item
#[utoipa::path(
    delete,
    path = "/admin/stores/{store_id}/items/{item_id}",
    params(
        ("store_id" = String, Path, description = "Store id"),
        ("item_id" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 400, description = "Unknown item", body = crate::errors::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path((store_id, item_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServiceError> {
    let store_id = parse_store_id(&store_id)?;
    let item_id = parse_item_id(&item_id)?;
    state.services.items.delete_item(store_id, item_id).await?;
    Ok(Json(ApiResponse::<()>::message("Item deleted successfully")))
}

/// Paginated item-request listing for a store
#[utoipa::path(
    get,
    path = "/admin/stores/{store_id}/requests",
    params(("store_id" = String, Path, description = "Store id"), ListQuery),
    responses(
        (status = 200, description = "Requests returned"),
        (status = 400, description = "Unknown store", body = crate::errors::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let store_id = parse_store_id(&store_id)?;
    let page = state
        .services
        .requests
        .list_requests(store_id, query.limit, query.page)
        .await?;
    Ok(Json(ApiResponse::listing(
        page.records,
        page.count,
        "Requests fetched successfully",
    )))
}

/// Paginated order listing for a store
#[utoipa::path(
    get,
    path = "/admin/stores/{store_id}/orders",
    params(("store_id" = String, Path, description = "Store id"), ListQuery),
    responses(
        (status = 200, description = "Orders returned"),
        (status = 400, description = "Unknown store", body = crate::errors::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let store_id = parse_store_id(&store_id)?;
    let page = state
        .services
        .orders
        .list_orders(store_id, query.limit, query.page)
        .await?;
    Ok(Json(ApiResponse::listing(
        page.records,
        page.count,
        "Orders fetched successfully",
    )))
}

/// Order detail with populated line items
#[utoipa::path(
    get,
    path = "/admin/stores/{store_id}/orders/{order_id}",
    params(
        ("store_id" = String, Path, description = "Store id"),
        ("order_id" = String, Path, description = "Order id")
    ),
    responses(
        (status = 200, description = "Order detail returned"),
        (status = 400, description = "Unknown store or order", body = crate::errors::ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn order_details(
    State(state): State<AppState>,
    Path((store_id, order_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServiceError> {
    let store_id = parse_store_id(&store_id)?;
    let order_id = parse_order_id(&order_id)?;
    let details = state
        .services
        .orders
        .order_details(store_id, order_id)
        .await?;
    Ok(Json(ApiResponse::success(
        details,
        "Order fetched successfully",
    )))
}
