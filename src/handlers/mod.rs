pub mod admin;
pub mod shopper;

use crate::{
    auth::AuthService,
    db::DbPool,
    errors::ServiceError,
    services::{AdminService, ItemRequestService, ItemService, OrderService, StoreService},
};
use std::sync::Arc;
use uuid::Uuid;

/// Container wiring every service to the shared connection pool.
#[derive(Clone)]
pub struct AppServices {
    pub stores: StoreService,
    pub items: ItemService,
    pub orders: OrderService,
    pub requests: ItemRequestService,
    pub admins: AdminService,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, auth: Arc<AuthService>) -> Self {
        let stores = StoreService::new(db_pool.clone());
        Self {
            items: ItemService::new(db_pool.clone(), stores.clone()),
            orders: OrderService::new(db_pool.clone(), stores.clone()),
            requests: ItemRequestService::new(db_pool.clone(), stores.clone()),
            admins: AdminService::new(db_pool, auth),
            stores,
        }
    }
}

// Malformed ids are reported with the same code as unknown ones, so the
// parse failure maps straight to the resource's domain error.

pub(crate) fn parse_store_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::InvalidStore)
}

pub(crate) fn parse_item_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::InvalidItem)
}

pub(crate) fn parse_order_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::InvalidOrder)
}
