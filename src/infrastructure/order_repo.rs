use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    distinct_user_ids, first_missing_user, flatten_submissions, CreatedOrder, OrderSubmission,
    OrderView, Page, UserOrders, UserView,
};
use crate::domain::ports::OrderRepository;
use crate::schema::{orders, users};

use super::models::{NewOrderRow, OrderRow, UserRow};

const CREATE_FAILED: &str = "Failed to create orders.";

/// Postgres accepts at most `u16::MAX` bind parameters per statement and every
/// order row binds three.
const MAX_ROWS_PER_INSERT: usize = u16::MAX as usize / 3;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<OrderRow> for CreatedOrder {
    fn from(row: OrderRow) -> Self {
        CreatedOrder {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            quantity: row.quantity,
        }
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn insert_checked(
        &self,
        requested: &[i32],
        new_rows: &[NewOrderRow],
    ) -> Result<Vec<CreatedOrder>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Every referenced user must exist; only ids are fetched.
            let existing: Vec<i32> = users::table
                .filter(users::id.eq_any(requested.to_vec()))
                .select(users::id)
                .load(conn)?;

            if let Some(missing) = first_missing_user(requested, &existing) {
                log::warn!("Order attempt by non-existent user ID: {}", missing);
                return Err(DomainError::InvalidInput(format!(
                    "User with ID {missing} not found."
                )));
            }

            // 2. Multi-row inserts, chunked under the bind parameter limit.
            // Serial ids follow the VALUES order.
            let mut rows: Vec<OrderRow> = Vec::with_capacity(new_rows.len());
            for chunk in new_rows.chunks(MAX_ROWS_PER_INSERT) {
                let inserted: Vec<OrderRow> = diesel::insert_into(orders::table)
                    .values(chunk)
                    .returning(OrderRow::as_returning())
                    .get_results(conn)?;
                rows.extend(inserted);
            }
            rows.sort_by_key(|row| row.id);

            Ok(rows.into_iter().map(CreatedOrder::from).collect())
        })
    }
}

impl OrderRepository for DieselOrderRepository {
    fn find_user_orders(&self, user_id: i32, page: Page) -> Result<Option<UserOrders>, DomainError> {
        let mut conn = self.pool.get()?;

        // Page and count must come from the same snapshot.
        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, DomainError, _>(|conn| {
                let user = users::table
                    .find(user_id)
                    .select(UserRow::as_select())
                    .first(conn)
                    .optional()?;

                let Some(user) = user else {
                    return Ok(None);
                };

                let rows = OrderRow::belonging_to(&user)
                    .select(OrderRow::as_select())
                    .order(orders::id.desc())
                    .limit(page.take)
                    .offset(page.skip)
                    .load(conn)?;

                let total_count: i64 = OrderRow::belonging_to(&user).count().get_result(conn)?;

                Ok(Some(UserOrders {
                    user: UserView {
                        id: user.id,
                        name: user.name,
                    },
                    orders: rows
                        .into_iter()
                        .map(|o| OrderView {
                            id: o.id,
                            product_id: o.product_id,
                            quantity: o.quantity,
                        })
                        .collect(),
                    total_count,
                }))
            })
    }

    fn create_orders(
        &self,
        submissions: &[OrderSubmission],
    ) -> Result<Vec<CreatedOrder>, DomainError> {
        let requested = distinct_user_ids(submissions);
        let new_rows: Vec<NewOrderRow> = flatten_submissions(submissions)
            .into_iter()
            .map(|line| NewOrderRow {
                user_id: line.user_id,
                product_id: line.product_id,
                quantity: line.quantity,
            })
            .collect();

        self.insert_checked(&requested, &new_rows)
            .map_err(|e| match e {
                DomainError::Internal(detail) => {
                    log::error!("Order creation failed: {}", detail);
                    DomainError::Internal(CREATE_FAILED.to_string())
                }
                other => other,
            })
    }
}
