use crate::{
    db::DbPool,
    entities::item_request::{
        self, ActiveModel as ItemRequestActiveModel, Entity as ItemRequestEntity,
    },
    errors::ServiceError,
    services::{page_window, Page, StoreService},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequestBody {
    /// Free-form item name, not a reference into the store's inventory
    #[validate(length(min = 1, message = "Item name is required"))]
    pub item: String,
    /// Pickup time as epoch seconds
    pub pick_up: i64,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemRequestSummary {
    pub id: Uuid,
    pub item_name: String,
    pub pick_up_time: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<item_request::Model> for ItemRequestSummary {
    fn from(model: item_request::Model) -> Self {
        Self {
            id: model.id,
            item_name: model.item_name,
            pick_up_time: model.pick_up_time,
            customer_name: model.customer_name,
            customer_phone: model.customer_phone,
            customer_email: model.customer_email,
            created_at: model.created_at,
        }
    }
}

#[derive(Clone)]
pub struct ItemRequestService {
    db_pool: Arc<DbPool>,
    stores: StoreService,
}

impl ItemRequestService {
    pub fn new(db_pool: Arc<DbPool>, stores: StoreService) -> Self {
        Self { db_pool, stores }
    }

    /// Records a shopper's request for an item the store does not carry.
    /// No stock or duplicate checks; the text is stored as supplied.
    #[instrument(skip(self, request), fields(store_id = %store_id))]
    pub async fn create_request(
        &self,
        store_id: Uuid,
        request: CreateItemRequestBody,
    ) -> Result<ItemRequestSummary, ServiceError> {
        request.validate()?;
        let store = self.stores.resolve(store_id).await?;

        let pick_up_time = DateTime::<Utc>::from_timestamp(request.pick_up, 0)
            .ok_or_else(|| ServiceError::ValidationError("pick_up is out of range".into()))?;

        let now = Utc::now();
        let model = ItemRequestActiveModel {
            id: Set(Uuid::new_v4()),
            item_name: Set(request.item),
            store_id: Set(store.id),
            pick_up_time: Set(pick_up_time),
            customer_name: Set(request.name),
            customer_phone: Set(request.phone),
            customer_email: Set(request.email),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await?;

        info!(request_id = %model.id, store_id = %store_id, "item request recorded");
        Ok(model.into())
    }

    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn list_requests(
        &self,
        store_id: Uuid,
        limit: Option<u64>,
        page: Option<u64>,
    ) -> Result<Page<ItemRequestSummary>, ServiceError> {
        self.stores.resolve(store_id).await?;

        let filter = item_request::Column::StoreId.eq(store_id);

        let count = ItemRequestEntity::find()
            .filter(filter.clone())
            .count(&*self.db_pool)
            .await?;
        let (limit, offset) = page_window(limit, page, count);

        let records = ItemRequestEntity::find()
            .filter(filter)
            .order_by_desc(item_request::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&*self.db_pool)
            .await?
            .into_iter()
            .map(ItemRequestSummary::from)
            .collect();

        Ok(Page { records, count })
    }
}
