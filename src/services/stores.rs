use crate::{
    db::DbPool,
    entities::item::{self, Entity as ItemEntity},
    entities::store::{self, ActiveModel as StoreActiveModel, Entity as StoreEntity},
    errors::ServiceError,
    services::{page_window, Page},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStoreRequest {
    #[validate(length(min = 1, message = "Store name is required"))]
    pub store_name: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    pub image: Option<String>,
}

/// Merge-edit payload; absent fields keep their stored values.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateStoreRequest {
    pub store_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// Store row as listed to shoppers, with timestamps and internals stripped.
#[derive(Debug, Serialize, ToSchema)]
pub struct StoreSummary {
    pub id: Uuid,
    pub store_name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<store::Model> for StoreSummary {
    fn from(model: store::Model) -> Self {
        Self {
            id: model.id,
            store_name: model.store_name,
            address: model.address,
            phone: model.phone,
            email: model.email,
            image: model.image,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryItem {
    pub id: Uuid,
    pub item_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<item::Model> for InventoryItem {
    fn from(model: item::Model) -> Self {
        Self {
            id: model.id,
            item_name: model.item_name,
            category: model.category,
            price: model.price,
            stock: model.stock,
            description: model.description,
            image: model.image,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreDetails {
    #[serde(flatten)]
    pub store: StoreSummary,
    pub inventory: Vec<InventoryItem>,
}

#[derive(Clone)]
pub struct StoreService {
    db_pool: Arc<DbPool>,
}

impl StoreService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Resolves a store by id. Soft-deleted stores still resolve; only the
    /// listings filter them out.
    pub async fn resolve(&self, store_id: Uuid) -> Result<store::Model, ServiceError> {
        StoreEntity::find_by_id(store_id)
            .one(&*self.db_pool)
            .await?
            .ok_or(ServiceError::InvalidStore)
    }

    #[instrument(skip(self, request), fields(store_name = %request.store_name))]
    pub async fn create_store(
        &self,
        request: CreateStoreRequest,
    ) -> Result<StoreSummary, ServiceError> {
        request.validate()?;

        let now = Utc::now();
        let model = StoreActiveModel {
            id: Set(Uuid::new_v4()),
            store_name: Set(request.store_name),
            address: Set(request.address),
            phone: Set(request.phone),
            email: Set(request.email),
            image: Set(request.image),
            deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create store");
            ServiceError::DatabaseError(e)
        })?;

        info!(store_id = %model.id, "store created");
        Ok(model.into())
    }

    #[instrument(skip(self, request), fields(store_id = %store_id))]
    pub async fn edit_store(
        &self,
        store_id: Uuid,
        request: UpdateStoreRequest,
    ) -> Result<StoreSummary, ServiceError> {
        let existing = self.resolve(store_id).await?;

        let mut active: StoreActiveModel = existing.into();
        if let Some(store_name) = request.store_name {
            active.store_name = Set(store_name);
        }
        if let Some(address) = request.address {
            active.address = Set(address);
        }
        if let Some(phone) = request.phone {
            active.phone = Set(phone);
        }
        if let Some(email) = request.email {
            active.email = Set(email);
        }
        if let Some(image) = request.image {
            active.image = Set(Some(image));
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&*self.db_pool).await?;
        info!(store_id = %model.id, "store updated");
        Ok(model.into())
    }

    /// Sets the soft-delete flag. The store's items are left untouched.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn delete_store(&self, store_id: Uuid) -> Result<(), ServiceError> {
        let existing = self.resolve(store_id).await?;

        let mut active: StoreActiveModel = existing.into();
        active.deleted = Set(true);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db_pool).await?;

        info!(store_id = %store_id, "store soft-deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_stores(
        &self,
        limit: Option<u64>,
        page: Option<u64>,
    ) -> Result<Page<StoreSummary>, ServiceError> {
        let filter = store::Column::Deleted.eq(false);

        let count = StoreEntity::find()
            .filter(filter.clone())
            .count(&*self.db_pool)
            .await?;
        let (limit, offset) = page_window(limit, page, count);

        let records = StoreEntity::find()
            .filter(filter)
            .order_by_desc(store::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&*self.db_pool)
            .await?
            .into_iter()
            .map(StoreSummary::from)
            .collect();

        Ok(Page { records, count })
    }

    /// Store detail with its live (non-deleted) inventory.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn store_details(&self, store_id: Uuid) -> Result<StoreDetails, ServiceError> {
        let store = self.resolve(store_id).await?;

        let inventory = ItemEntity::find()
            .filter(item::Column::StoreId.eq(store_id))
            .filter(item::Column::Deleted.eq(false))
            .order_by_desc(item::Column::CreatedAt)
            .all(&*self.db_pool)
            .await?
            .into_iter()
            .map(InventoryItem::from)
            .collect();

        Ok(StoreDetails {
            store: store.into(),
            inventory,
        })
    }
}
