pub mod admins;
pub mod items;
pub mod orders;
pub mod requests;
pub mod stores;

pub use admins::AdminService;
pub use items::ItemService;
pub use orders::OrderService;
pub use requests::ItemRequestService;
pub use stores::StoreService;

use serde::Serialize;

/// One page of a listing plus the total matching count.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub count: u64,
}

/// Resolves the effective limit and offset for a listing query.
///
/// A missing or zero `limit` defaults to the total matching count (return
/// everything); `page` is 1-indexed and `offset = limit * (page - 1)`.
pub(crate) fn page_window(limit: Option<u64>, page: Option<u64>, total: u64) -> (u64, u64) {
    let limit = limit.filter(|l| *l > 0).unwrap_or(total);
    let page = page.unwrap_or(1).max(1);
    let offset = limit.saturating_mul(page - 1);
    (limit, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_limit_returns_everything() {
        assert_eq!(page_window(None, None, 42), (42, 0));
    }

    #[test]
    fn zero_limit_is_treated_as_absent() {
        assert_eq!(page_window(Some(0), None, 42), (42, 0));
    }

    #[test]
    fn page_is_one_indexed() {
        assert_eq!(page_window(Some(10), Some(1), 42), (10, 0));
        assert_eq!(page_window(Some(10), Some(3), 42), (10, 20));
    }

    #[test]
    fn page_zero_is_clamped_to_first() {
        assert_eq!(page_window(Some(10), Some(0), 42), (10, 0));
    }

    #[test]
    fn missing_limit_with_page_offsets_by_total() {
        assert_eq!(page_window(None, Some(2), 5), (5, 5));
    }
}
