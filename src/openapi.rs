use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::ErrorResponse;
use crate::services::admins::{AdminProfile, CreateAdminRequest, LoginRequest};
use crate::services::items::{CreateItemRequest, ItemDetails, UpdateItemRequest};
use crate::services::orders::{OrderDetails, OrderLineDetail, OrderSummary, PlaceOrderRequest};
use crate::services::requests::{CreateItemRequestBody, ItemRequestSummary};
use crate::services::stores::{
    CreateStoreRequest, InventoryItem, StoreDetails, StoreSummary, UpdateStoreRequest,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        description = "Multi-store inventory and pickup-ordering backend",
        version = env!("CARGO_PKG_VERSION"),
    ),
    paths(
        crate::handlers::shopper::list_stores,
        crate::handlers::shopper::store_details,
        crate::handlers::shopper::store_inventory,
        crate::handlers::shopper::item_details,
        crate::handlers::shopper::place_order,
        crate::handlers::shopper::request_item,
        crate::handlers::admin::create_admin,
        crate::handlers::admin::login,
        crate::handlers::admin::create_store,
        crate::handlers::admin::edit_store,
        crate::handlers::admin::delete_store,
        crate::handlers::admin::create_item,
        crate::handlers::admin::edit_item,
        crate::handlers::admin::delete_item,
        crate::handlers::admin::list_requests,
        crate::handlers::admin::list_orders,
        crate::handlers::admin::order_details,
    ),
    components(schemas(
        ErrorResponse,
        StoreSummary,
        StoreDetails,
        InventoryItem,
        ItemDetails,
        CreateStoreRequest,
        UpdateStoreRequest,
        CreateItemRequest,
        UpdateItemRequest,
        PlaceOrderRequest,
        OrderDetails,
        OrderLineDetail,
        OrderSummary,
        CreateItemRequestBody,
        ItemRequestSummary,
        CreateAdminRequest,
        LoginRequest,
        AdminProfile,
    )),
    tags(
        (name = "shopper", description = "Public storefront endpoints"),
        (name = "admin", description = "Authenticated management endpoints"),
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("openapi serializes");
        assert!(json.contains("/web/stores"));
        assert!(json.contains("/admin/login"));
    }
}
