pub mod admin;
pub mod item;
pub mod item_request;
pub mod order;
pub mod order_item;
pub mod store;

pub use order::OrderStatus;
