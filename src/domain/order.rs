use std::collections::HashSet;

pub const DEFAULT_TAKE: i64 = 10;
pub const DEFAULT_SKIP: i64 = 0;

/// Limit/offset window over a user's orders, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub take: i64,
    pub skip: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            take: DEFAULT_TAKE,
            skip: DEFAULT_SKIP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemInput {
    pub product_id: i32,
    pub quantity: i32,
}

/// One `{userId, items}` entry of a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSubmission {
    pub user_id: i32,
    pub items: Vec<OrderItemInput>,
}

/// A single row about to be written: one item of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineInput {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrder {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderView {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOrders {
    pub user: UserView,
    pub orders: Vec<OrderView>,
    pub total_count: i64,
}

/// Referenced user ids without duplicates, in first-seen order.
pub fn distinct_user_ids(submissions: &[OrderSubmission]) -> Vec<i32> {
    let mut seen = HashSet::new();
    submissions
        .iter()
        .map(|s| s.user_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// First id of `requested` that is absent from `existing`.
pub fn first_missing_user(requested: &[i32], existing: &[i32]) -> Option<i32> {
    let existing: HashSet<i32> = existing.iter().copied().collect();
    requested.iter().copied().find(|id| !existing.contains(id))
}

pub fn flatten_submissions(submissions: &[OrderSubmission]) -> Vec<OrderLineInput> {
    submissions
        .iter()
        .flat_map(|s| {
            s.items.iter().map(move |item| OrderLineInput {
                user_id: s.user_id,
                product_id: item.product_id,
                quantity: item.quantity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(user_id: i32, items: &[(i32, i32)]) -> OrderSubmission {
        OrderSubmission {
            user_id,
            items: items
                .iter()
                .map(|&(product_id, quantity)| OrderItemInput {
                    product_id,
                    quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn default_page_takes_ten_from_the_start() {
        assert_eq!(Page::default(), Page { take: 10, skip: 0 });
    }

    #[test]
    fn distinct_user_ids_keeps_first_seen_order() {
        let submissions = vec![
            submission(3, &[(1, 1)]),
            submission(1, &[(1, 1)]),
            submission(3, &[(2, 1)]),
            submission(2, &[(1, 1)]),
        ];
        assert_eq!(distinct_user_ids(&submissions), vec![3, 1, 2]);
    }

    #[test]
    fn first_missing_user_reports_in_request_order() {
        assert_eq!(first_missing_user(&[1, 7, 9], &[1]), Some(7));
        assert_eq!(first_missing_user(&[9, 7, 1], &[1]), Some(9));
        assert_eq!(first_missing_user(&[1, 2], &[2, 1]), None);
        assert_eq!(first_missing_user(&[], &[]), None);
    }

    #[test]
    fn flatten_emits_one_line_per_item_in_submission_order() {
        let submissions = vec![
            submission(1, &[(10, 2), (11, 1)]),
            submission(2, &[(12, 5)]),
        ];

        let lines = flatten_submissions(&submissions);

        assert_eq!(
            lines,
            vec![
                OrderLineInput { user_id: 1, product_id: 10, quantity: 2 },
                OrderLineInput { user_id: 1, product_id: 11, quantity: 1 },
                OrderLineInput { user_id: 2, product_id: 12, quantity: 5 },
            ]
        );
    }

    #[test]
    fn flatten_of_duplicate_submissions_keeps_both() {
        let submissions = vec![submission(1, &[(10, 2)]), submission(1, &[(10, 2)])];
        assert_eq!(flatten_submissions(&submissions).len(), 2);
    }
}
