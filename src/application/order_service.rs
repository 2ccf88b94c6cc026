use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::order::{CreatedOrder, OrderSubmission, Page, UserOrders};
use crate::domain::ports::OrderRepository;

/// Service type shared by the HTTP handlers.
pub type SharedOrderService = OrderService<Arc<dyn OrderRepository>>;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_orders_by_user(&self, user_id: i32, page: Page) -> Result<UserOrders, DomainError> {
        self.repo
            .find_user_orders(user_id, page)?
            .ok_or(DomainError::UserNotFound(user_id))
    }

    pub fn create_orders(
        &self,
        submissions: Vec<OrderSubmission>,
    ) -> Result<Vec<CreatedOrder>, DomainError> {
        if submissions.is_empty() {
            return Err(DomainError::InvalidInput("Order list required".to_string()));
        }
        if let Some(empty) = submissions.iter().find(|s| s.items.is_empty()) {
            return Err(DomainError::InvalidInput(format!(
                "Order for user ID {} has no items",
                empty.user_id
            )));
        }
        self.repo.create_orders(&submissions)
    }
}
