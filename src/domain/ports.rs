use std::sync::Arc;

use super::errors::DomainError;
use super::order::{CreatedOrder, OrderSubmission, Page, UserOrders};

pub trait OrderRepository: Send + Sync + 'static {
    /// Returns `None` when the user does not exist.
    fn find_user_orders(&self, user_id: i32, page: Page) -> Result<Option<UserOrders>, DomainError>;

    /// Checks every referenced user, then inserts one row per item in a single
    /// transaction. Rows come back in submission order.
    fn create_orders(
        &self,
        submissions: &[OrderSubmission],
    ) -> Result<Vec<CreatedOrder>, DomainError>;
}

impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    fn find_user_orders(&self, user_id: i32, page: Page) -> Result<Option<UserOrders>, DomainError> {
        (**self).find_user_orders(user_id, page)
    }

    fn create_orders(
        &self,
        submissions: &[OrderSubmission],
    ) -> Result<Vec<CreatedOrder>, DomainError> {
        (**self).create_orders(submissions)
    }
}
