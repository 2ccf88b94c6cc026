//! In-memory repository used by the service and handler unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    distinct_user_ids, first_missing_user, flatten_submissions, CreatedOrder, OrderSubmission,
    OrderView, Page, UserOrders, UserView,
};
use crate::domain::ports::OrderRepository;

#[derive(Default)]
struct Store {
    users: BTreeMap<i32, String>,
    orders: Vec<CreatedOrder>,
    next_id: i32,
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    store: Mutex<Store>,
    fail_writes: AtomicBool,
}

impl InMemoryOrderRepository {
    pub fn with_users(users: &[(i32, &str)]) -> Self {
        let repo = Self::default();
        {
            let mut store = repo.store.lock().expect("store lock poisoned");
            store.next_id = 1;
            for &(id, name) in users {
                store.users.insert(id, name.to_string());
            }
        }
        repo
    }

    /// Makes every subsequent `create_orders` call fail like a lost connection.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn order_count(&self) -> usize {
        self.store.lock().expect("store lock poisoned").orders.len()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn find_user_orders(&self, user_id: i32, page: Page) -> Result<Option<UserOrders>, DomainError> {
        let store = self.store.lock().expect("store lock poisoned");
        let Some(name) = store.users.get(&user_id) else {
            return Ok(None);
        };

        let mut owned: Vec<&CreatedOrder> =
            store.orders.iter().filter(|o| o.user_id == user_id).collect();
        owned.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(Some(UserOrders {
            user: UserView {
                id: user_id,
                name: name.clone(),
            },
            orders: owned
                .iter()
                .skip(page.skip as usize)
                .take(page.take as usize)
                .map(|o| OrderView {
                    id: o.id,
                    product_id: o.product_id,
                    quantity: o.quantity,
                })
                .collect(),
            total_count: owned.len() as i64,
        }))
    }

    fn create_orders(
        &self,
        submissions: &[OrderSubmission],
    ) -> Result<Vec<CreatedOrder>, DomainError> {
        let mut store = self.store.lock().expect("store lock poisoned");

        let requested = distinct_user_ids(submissions);
        let existing: Vec<i32> = store.users.keys().copied().collect();
        if let Some(missing) = first_missing_user(&requested, &existing) {
            return Err(DomainError::InvalidInput(format!(
                "User with ID {missing} not found."
            )));
        }

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::Internal("Failed to create orders.".to_string()));
        }

        let mut created = Vec::new();
        for line in flatten_submissions(submissions) {
            let order = CreatedOrder {
                id: store.next_id,
                user_id: line.user_id,
                product_id: line.product_id,
                quantity: line.quantity,
            };
            store.next_id += 1;
            created.push(order);
        }
        store.orders.extend(created.iter().cloned());
        Ok(created)
    }
}
