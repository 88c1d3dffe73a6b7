use crate::{
    db::DbPool,
    entities::item::{self, ActiveModel as ItemActiveModel, Entity as ItemEntity},
    errors::ServiceError,
    services::{page_window, stores::InventoryItem, stores::StoreSummary, Page, StoreService},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub item_name: String,
    pub category: Option<String>,
    /// Accepted as a JSON number or numeric string
    #[schema(value_type = String)]
    pub price: Value,
    /// Accepted as a JSON integer or numeric string; defaults to 0
    #[schema(value_type = Option<String>)]
    pub quantity: Option<Value>,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Merge-edit payload; absent fields keep their stored values.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub item_name: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub quantity: Option<Value>,
    pub image: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemDetails {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub store: StoreSummary,
}

/// Parses the client-supplied price. Non-numeric or negative input is the
/// caller's mistake, reported as `INVALID_PRICE`.
fn parse_price(value: &Value) -> Result<Decimal, ServiceError> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(ServiceError::InvalidPrice),
    };
    let price = Decimal::from_str(&text).map_err(|_| ServiceError::InvalidPrice)?;
    if price < Decimal::ZERO {
        return Err(ServiceError::InvalidPrice);
    }
    Ok(price)
}

/// Parses the client-supplied stock quantity, reported as `INVALID_QUANTITY`
/// on non-integer or negative input.
fn parse_quantity(value: &Value) -> Result<i32, ServiceError> {
    let quantity = match value {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
    .ok_or(ServiceError::InvalidQuantity)?;
    if quantity < 0 {
        return Err(ServiceError::InvalidQuantity);
    }
    i32::try_from(quantity).map_err(|_| ServiceError::InvalidQuantity)
}

#[derive(Clone)]
pub struct ItemService {
    db_pool: Arc<DbPool>,
    stores: StoreService,
}

impl ItemService {
    pub fn new(db_pool: Arc<DbPool>, stores: StoreService) -> Self {
        Self { db_pool, stores }
    }

    /// Resolves an item within a store. Soft-deleted items still resolve.
    async fn resolve(&self, store_id: Uuid, item_id: Uuid) -> Result<item::Model, ServiceError> {
        ItemEntity::find_by_id(item_id)
            .filter(item::Column::StoreId.eq(store_id))
            .one(&*self.db_pool)
            .await?
            .ok_or(ServiceError::InvalidItem)
    }

    #[instrument(skip(self, request), fields(store_id = %store_id, item_name = %request.item_name))]
    pub async fn create_item(
        &self,
        store_id: Uuid,
        request: CreateItemRequest,
    ) -> Result<InventoryItem, ServiceError> {
        request.validate()?;
        let store = self.stores.resolve(store_id).await?;

        let price = parse_price(&request.price)?;
        let stock = match &request.quantity {
            Some(value) => parse_quantity(value)?,
            None => 0,
        };

        let now = Utc::now();
        let model = ItemActiveModel {
            id: Set(Uuid::new_v4()),
            item_name: Set(request.item_name),
            category: Set(request.category),
            price: Set(price),
            image: Set(request.image),
            description: Set(request.description),
            store_id: Set(store.id),
            stock: Set(stock),
            deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, store_id = %store_id, "Failed to create item");
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = %model.id, store_id = %store_id, "item created");
        Ok(model.into())
    }

    #[instrument(skip(self, request), fields(store_id = %store_id, item_id = %item_id))]
    pub async fn edit_item(
        &self,
        store_id: Uuid,
        item_id: Uuid,
        request: UpdateItemRequest,
    ) -> Result<InventoryItem, ServiceError> {
        let existing = self.resolve(store_id, item_id).await?;

        let mut active: ItemActiveModel = existing.into();
        if let Some(item_name) = request.item_name {
            active.item_name = Set(item_name);
        }
        if let Some(category) = request.category {
            active.category = Set(Some(category));
        }
        if let Some(price) = request.price {
            active.price = Set(parse_price(&price)?);
        }
        if let Some(quantity) = request.quantity {
            active.stock = Set(parse_quantity(&quantity)?);
        }
        if let Some(image) = request.image {
            active.image = Set(Some(image));
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&*self.db_pool).await?;
        info!(item_id = %model.id, "item updated");
        Ok(model.into())
    }

    #[instrument(skip(self), fields(store_id = %store_id, item_id = %item_id))]
    pub async fn delete_item(&self, store_id: Uuid, item_id: Uuid) -> Result<(), ServiceError> {
        let existing = self.resolve(store_id, item_id).await?;

        let mut active: ItemActiveModel = existing.into();
        active.deleted = Set(true);
        active.updated_at = Set(Utc::now());
        active.update(&*self.db_pool).await?;

        info!(item_id = %item_id, "item soft-deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn list_items(
        &self,
        store_id: Uuid,
        limit: Option<u64>,
        page: Option<u64>,
    ) -> Result<Page<InventoryItem>, ServiceError> {
        self.stores.resolve(store_id).await?;

        let filter = item::Column::StoreId
            .eq(store_id)
            .and(item::Column::Deleted.eq(false));

        let count = ItemEntity::find()
            .filter(filter.clone())
            .count(&*self.db_pool)
            .await?;
        let (limit, offset) = page_window(limit, page, count);

        let records = ItemEntity::find()
            .filter(filter)
            .order_by_desc(item::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&*self.db_pool)
            .await?
            .into_iter()
            .map(InventoryItem::from)
            .collect();

        Ok(Page { records, count })
    }

    #[instrument(skip(self), fields(store_id = %store_id, item_id = %item_id))]
    pub async fn item_details(
        &self,
        store_id: Uuid,
        item_id: Uuid,
    ) -> Result<ItemDetails, ServiceError> {
        let store = self.stores.resolve(store_id).await?;
        let item = self.resolve(store_id, item_id).await?;

        Ok(ItemDetails {
            item: item.into(),
            store: store.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_price(&json!(12.5)).unwrap(), Decimal::new(125, 1));
        assert_eq!(parse_price(&json!("3.99")).unwrap(), Decimal::new(399, 2));
        assert_eq!(parse_price(&json!(0)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn price_rejects_garbage_and_negatives() {
        assert!(matches!(
            parse_price(&json!("cheap")),
            Err(ServiceError::InvalidPrice)
        ));
        assert!(matches!(
            parse_price(&json!(-1.0)),
            Err(ServiceError::InvalidPrice)
        ));
        assert!(matches!(
            parse_price(&json!(null)),
            Err(ServiceError::InvalidPrice)
        ));
    }

    #[test]
    fn quantity_accepts_integers_and_numeric_strings() {
        assert_eq!(parse_quantity(&json!(7)).unwrap(), 7);
        assert_eq!(parse_quantity(&json!("12")).unwrap(), 12);
    }

    #[test]
    fn quantity_rejects_fractions_and_negatives() {
        assert!(matches!(
            parse_quantity(&json!(1.5)),
            Err(ServiceError::InvalidQuantity)
        ));
        assert!(matches!(
            parse_quantity(&json!(-3)),
            Err(ServiceError::InvalidQuantity)
        ));
        assert!(matches!(
            parse_quantity(&json!("lots")),
            Err(ServiceError::InvalidQuantity)
        ));
    }
}
