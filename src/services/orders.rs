use crate::{
    db::DbPool,
    entities::item::{self, Entity as ItemEntity},
    entities::order::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity, OrderStatus},
    entities::order_item::{self, ActiveModel as OrderItemActiveModel, Entity as OrderItemEntity},
    entities::store,
    errors::ServiceError,
    services::{page_window, Page, StoreService},
};
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

fn default_line_quantity() -> i32 {
    1
}

/// One cart line as decoded from the `items` JSON string.
#[derive(Debug, Deserialize)]
pub struct OrderLine {
    pub item: String,
    #[serde(default = "default_line_quantity")]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PlaceOrderRequest {
    /// JSON string encoding `[{"item": <id>, "quantity": <n>}]`
    pub items: String,
    /// Pickup time as epoch seconds
    pub pick_up: i64,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    pub email: Option<String>,
    /// Client-declared order total
    #[schema(value_type = String)]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderLineDetail {
    pub item_id: Uuid,
    pub item_name: String,
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetails {
    pub id: Uuid,
    pub order_no: String,
    pub pick_up_time: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    pub status: Option<OrderStatus>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderLineDetail>,
}

/// Order row as listed to admins, augmented with its line count.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummary {
    pub id: Uuid,
    pub order_no: String,
    pub pick_up_time: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    pub status: Option<OrderStatus>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub no_of_items: u64,
}

/// A freshly placed order together with its store, handed to the notification
/// fan-out.
#[derive(Debug)]
pub struct PlacedOrder {
    pub order: OrderDetails,
    pub store: store::Model,
}

/// Generates a short order reference: three uniform-random uppercase letters
/// followed by three uniform-random digits. Collisions are possible and
/// accepted; the UUID primary key is the real identity.
pub fn generate_order_no() -> String {
    let mut rng = rand::thread_rng();
    let mut order_no = String::with_capacity(6);
    for _ in 0..3 {
        order_no.push(rng.gen_range(b'A'..=b'Z') as char);
    }
    for _ in 0..3 {
        order_no.push(char::from_digit(rng.gen_range(0..10), 10).unwrap_or('0'));
    }
    order_no
}

struct ValidatedLine {
    item: item::Model,
    quantity: i32,
}

#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    stores: StoreService,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>, stores: StoreService) -> Self {
        Self { db_pool, stores }
    }

    /// Places a pickup order: validates every cart line against current stock,
    /// persists the order with its lines, then decrements stock per line.
    ///
    /// Stock checks all pass before anything is written, so a rejected order
    /// leaves every item untouched. The per-line decrements afterwards are
    /// independent atomic updates, not one transaction.
    #[instrument(skip(self, request), fields(store_id = %store_id, customer = %request.name))]
    pub async fn place_order(
        &self,
        store_id: Uuid,
        request: PlaceOrderRequest,
    ) -> Result<PlacedOrder, ServiceError> {
        request.validate()?;
        let store = self.stores.resolve(store_id).await?;

        if request.items.trim().is_empty() {
            return Err(ServiceError::EmptyCart);
        }
        let lines: Vec<OrderLine> =
            serde_json::from_str(&request.items).map_err(|_| ServiceError::EmptyCart)?;
        if lines.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        let validated = self.check_stock(store_id, &lines).await?;

        let pick_up_time = DateTime::<Utc>::from_timestamp(request.pick_up, 0)
            .ok_or_else(|| ServiceError::ValidationError("pick_up is out of range".into()))?;

        let order_no = generate_order_no();
        let order_id = Uuid::new_v4();
        let now = Utc::now();

        let txn = self.db_pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start order transaction");
            ServiceError::DatabaseError(e)
        })?;

        let order_model = OrderActiveModel {
            id: Set(order_id),
            order_no: Set(order_no),
            store_id: Set(store.id),
            pick_up_time: Set(pick_up_time),
            customer_name: Set(request.name),
            customer_phone: Set(request.phone),
            customer_email: Set(request.email),
            status: Set(None),
            total_amount: Set(request.amount),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let line_models: Vec<OrderItemActiveModel> = validated
            .iter()
            .map(|line| OrderItemActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                item_id: Set(line.item.id),
                quantity: Set(line.quantity),
                created_at: Set(now),
            })
            .collect();
        OrderItemEntity::insert_many(line_models).exec(&txn).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to commit order");
            ServiceError::DatabaseError(e)
        })?;

        for line in &validated {
            let result = ItemEntity::update_many()
                .col_expr(
                    item::Column::Stock,
                    Expr::col(item::Column::Stock).sub(line.quantity),
                )
                .filter(item::Column::Id.eq(line.item.id))
                .exec(&*self.db_pool)
                .await;
            if let Err(e) = result {
                warn!(error = %e, item_id = %line.item.id, order_id = %order_id,
                    "stock decrement failed after order was persisted");
            }
        }

        info!(order_id = %order_id, order_no = %order_model.order_no, "order placed");

        let items = validated
            .into_iter()
            .map(|line| OrderLineDetail {
                item_id: line.item.id,
                item_name: line.item.item_name,
                price: line.item.price,
                quantity: line.quantity,
            })
            .collect();

        Ok(PlacedOrder {
            order: OrderDetails {
                id: order_model.id,
                order_no: order_model.order_no,
                pick_up_time: order_model.pick_up_time,
                customer_name: order_model.customer_name,
                customer_phone: order_model.customer_phone,
                customer_email: order_model.customer_email,
                status: order_model.status,
                total_amount: order_model.total_amount,
                created_at: order_model.created_at,
                items,
            },
            store,
        })
    }

    /// Re-fetches every line's item and compares quantity against current
    /// stock. Fails before any write so a rejected cart has no side effects.
    async fn check_stock(
        &self,
        store_id: Uuid,
        lines: &[OrderLine],
    ) -> Result<Vec<ValidatedLine>, ServiceError> {
        let mut validated = Vec::with_capacity(lines.len());
        for line in lines {
            // A zero or negative quantity would turn the decrement below
            // into a stock increase.
            if line.quantity < 1 {
                return Err(ServiceError::InvalidQuantity);
            }
            let item_id = Uuid::parse_str(&line.item).map_err(|_| ServiceError::InvalidItem)?;
            let item = ItemEntity::find_by_id(item_id)
                .filter(item::Column::StoreId.eq(store_id))
                .one(&*self.db_pool)
                .await?
                .ok_or(ServiceError::InvalidItem)?;

            if line.quantity > item.stock {
                return Err(ServiceError::OutOfStock(item.item_name));
            }
            validated.push(ValidatedLine {
                item,
                quantity: line.quantity,
            });
        }
        Ok(validated)
    }

    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn list_orders(
        &self,
        store_id: Uuid,
        limit: Option<u64>,
        page: Option<u64>,
    ) -> Result<Page<OrderSummary>, ServiceError> {
        self.stores.resolve(store_id).await?;

        let filter = order::Column::StoreId.eq(store_id);

        let count = OrderEntity::find()
            .filter(filter.clone())
            .count(&*self.db_pool)
            .await?;
        let (limit, offset) = page_window(limit, page, count);

        let orders = OrderEntity::find()
            .filter(filter)
            .order_by_desc(order::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&*self.db_pool)
            .await?;

        // One batched query for the page's line counts instead of N queries.
        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let mut line_counts: HashMap<Uuid, u64> = HashMap::new();
        if !order_ids.is_empty() {
            let lines = OrderItemEntity::find()
                .filter(order_item::Column::OrderId.is_in(order_ids))
                .all(&*self.db_pool)
                .await?;
            for line in lines {
                *line_counts.entry(line.order_id).or_default() += 1;
            }
        }

        let records = orders
            .into_iter()
            .map(|o| {
                let no_of_items = line_counts.get(&o.id).copied().unwrap_or(0);
                OrderSummary {
                    id: o.id,
                    order_no: o.order_no,
                    pick_up_time: o.pick_up_time,
                    customer_name: o.customer_name,
                    customer_phone: o.customer_phone,
                    customer_email: o.customer_email,
                    status: o.status,
                    total_amount: o.total_amount,
                    created_at: o.created_at,
                    no_of_items,
                }
            })
            .collect();

        Ok(Page { records, count })
    }

    #[instrument(skip(self), fields(store_id = %store_id, order_id = %order_id))]
    pub async fn order_details(
        &self,
        store_id: Uuid,
        order_id: Uuid,
    ) -> Result<OrderDetails, ServiceError> {
        self.stores.resolve(store_id).await?;

        let order = OrderEntity::find_by_id(order_id)
            .filter(order::Column::StoreId.eq(store_id))
            .one(&*self.db_pool)
            .await?
            .ok_or(ServiceError::InvalidOrder)?;

        let lines = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .find_also_related(ItemEntity)
            .all(&*self.db_pool)
            .await?;

        let items = lines
            .into_iter()
            .map(|(line, item)| {
                let (item_name, price) = item
                    .map(|i| (i.item_name, i.price))
                    .unwrap_or_else(|| ("unknown".to_string(), Decimal::ZERO));
                OrderLineDetail {
                    item_id: line.item_id,
                    item_name,
                    price,
                    quantity: line.quantity,
                }
            })
            .collect();

        Ok(OrderDetails {
            id: order.id,
            order_no: order.order_no,
            pick_up_time: order.pick_up_time,
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
            customer_email: order.customer_email,
            status: order.status,
            total_amount: order.total_amount,
            created_at: order.created_at,
            items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_no_matches_expected_shape() {
        let pattern = regex::Regex::new(r"^[A-Z]{3}[0-9]{3}$").unwrap();
        for _ in 0..200 {
            let order_no = generate_order_no();
            assert!(pattern.is_match(&order_no), "bad order_no: {order_no}");
        }
    }

    #[test]
    fn cart_lines_default_quantity_to_one() {
        let lines: Vec<OrderLine> =
            serde_json::from_str(r#"[{"item": "abc"}, {"item": "def", "quantity": 4}]"#).unwrap();
        assert_eq!(lines[0].quantity, 1);
        assert_eq!(lines[1].quantity, 4);
    }
}
