//! Request validation.
//!
//! Payloads arrive as loosely typed JSON or query strings. Each DTO has an
//! explicit validation function that coerces numeric strings, ignores unknown
//! fields and collects every violation as a [`FieldError`] before any business
//! logic runs.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

use crate::domain::order::{OrderItemInput, OrderSubmission, Page, DEFAULT_SKIP, DEFAULT_TAKE};

/// A property that failed validation together with its constraint messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub property: String,
    pub constraints: Vec<String>,
}

impl FieldError {
    pub fn new<I, S>(property: impl Into<String>, constraints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            property: property.into(),
            constraints: constraints.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summarize(.0))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[cfg(test)]
    pub(crate) fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }
}

/// `Validation failed: <properties>, <first constraint>`; the trailing part is
/// dropped when the first error has no constraint.
fn summarize(errors: &[FieldError]) -> String {
    let properties = errors
        .iter()
        .map(|e| e.property.as_str())
        .collect::<Vec<_>>()
        .join(",");

    match errors.first().and_then(|e| e.constraints.first()) {
        Some(message) => format!("Validation failed: {properties}, {message}"),
        None => format!("Validation failed: {properties}"),
    }
}

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateOrderItemDto {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateOrderDto {
    pub user_id: i32,
    /// Must not be empty.
    pub items: Vec<CreateOrderItemDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CreateOrdersRequest {
    /// Must not be empty.
    pub orders: Vec<CreateOrderDto>,
}

impl From<CreateOrderDto> for OrderSubmission {
    fn from(dto: CreateOrderDto) -> Self {
        OrderSubmission {
            user_id: dto.user_id,
            items: dto
                .items
                .into_iter()
                .map(|item| OrderItemInput {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// Raw `GET /orders` query string. Values stay strings until validated.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetOrdersQuery {
    /// User whose orders are listed.
    #[serde(rename = "userId")]
    #[param(value_type = i32)]
    pub user_id: Option<String>,
    /// Page size, default 10, not negative.
    #[param(value_type = Option<i64>)]
    pub take: Option<String>,
    /// Orders to skip, default 0, not negative.
    #[param(value_type = Option<i64>)]
    pub skip: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOrdersRequest {
    pub user_id: i32,
    pub page: Page,
}

// ── Integer coercion ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coerced {
    Value(i64),
    Missing,
    NotInteger,
    Overflow { negative: bool },
}

#[derive(Debug, Clone, Copy)]
struct IntRule {
    min: i64,
    max: i64,
    not_empty: bool,
}

const ID_FIELD: IntRule = IntRule {
    min: i32::MIN as i64,
    max: i32::MAX as i64,
    not_empty: true,
};

const QUERY_ID: IntRule = IntRule {
    not_empty: false,
    ..ID_FIELD
};

const WINDOW: IntRule = IntRule {
    min: 0,
    max: i64::MAX,
    not_empty: false,
};

fn coerce_float(f: f64) -> Coerced {
    if !f.is_finite() || f.fract() != 0.0 {
        Coerced::NotInteger
    } else if f >= i64::MAX as f64 || f < i64::MIN as f64 {
        Coerced::Overflow { negative: f < 0.0 }
    } else {
        Coerced::Value(f as i64)
    }
}

fn coerce_str(raw: &str) -> Coerced {
    let raw = raw.trim();
    if raw.is_empty() {
        return Coerced::Missing;
    }
    if let Ok(v) = raw.parse::<i64>() {
        return Coerced::Value(v);
    }
    match raw.parse::<f64>() {
        Ok(f) => coerce_float(f),
        Err(_) => Coerced::NotInteger,
    }
}

fn coerce_json(value: Option<&Value>) -> Coerced {
    match value {
        None | Some(Value::Null) => Coerced::Missing,
        Some(Value::Number(n)) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(v), _, _) => Coerced::Value(v),
            (None, Some(_), _) => Coerced::Overflow { negative: false },
            (None, None, Some(f)) => coerce_float(f),
            _ => Coerced::NotInteger,
        },
        Some(Value::String(s)) => coerce_str(s),
        Some(_) => Coerced::NotInteger,
    }
}

fn check_int(
    errors: &mut Vec<FieldError>,
    property: String,
    name: &str,
    coerced: Coerced,
    rule: IntRule,
) -> Option<i64> {
    let too_large = || format!("{name} must not be greater than {}", rule.max);
    let too_small = || format!("{name} must not be less than {}", rule.min);

    let constraints = match coerced {
        Coerced::Value(v) if v > rule.max => vec![too_large()],
        Coerced::Value(v) if v < rule.min => vec![too_small()],
        Coerced::Value(v) => return Some(v),
        Coerced::Missing if rule.not_empty => vec![
            format!("{name} must be an integer number"),
            format!("{name} should not be empty"),
        ],
        Coerced::Missing | Coerced::NotInteger => vec![format!("{name} must be an integer number")],
        Coerced::Overflow { negative: false } => vec![too_large()],
        Coerced::Overflow { negative: true } => vec![too_small()],
    };
    errors.push(FieldError::new(property, constraints));
    None
}

/// Narrows a value already range-checked against an `i32` rule.
fn id(value: i64) -> i32 {
    value as i32
}

// ── Validators ───────────────────────────────────────────────────────────────

pub fn validate_get_orders(query: &GetOrdersQuery) -> Result<GetOrdersRequest, ValidationErrors> {
    let mut errors = Vec::new();

    let user_id = check_int(
        &mut errors,
        "userId".to_string(),
        "userId",
        query.user_id.as_deref().map_or(Coerced::Missing, coerce_str),
        QUERY_ID,
    );

    let mut window = |name: &str, raw: Option<&str>, default: i64| match raw
        .filter(|s| !s.trim().is_empty())
    {
        None => Some(default),
        Some(raw) => check_int(&mut errors, name.to_string(), name, coerce_str(raw), WINDOW),
    };
    let take = window("take", query.take.as_deref(), DEFAULT_TAKE);
    let skip = window("skip", query.skip.as_deref(), DEFAULT_SKIP);

    match (user_id, take, skip) {
        (Some(user_id), Some(take), Some(skip)) if errors.is_empty() => Ok(GetOrdersRequest {
            user_id: id(user_id),
            page: Page { take, skip },
        }),
        _ => Err(ValidationErrors(errors)),
    }
}

pub fn validate_create_orders(body: &Value) -> Result<CreateOrdersRequest, ValidationErrors> {
    let mut errors = Vec::new();
    let mut orders = Vec::new();

    match body.get("orders") {
        None | Some(Value::Null) => errors.push(FieldError::new(
            "orders",
            ["Order list required", "orders must be an array"],
        )),
        Some(Value::Array(list)) if list.is_empty() => {
            errors.push(FieldError::new("orders", ["Order list required"]))
        }
        Some(Value::Array(list)) => {
            for (i, entry) in list.iter().enumerate() {
                if let Some(order) = validate_order(&format!("orders.{i}"), entry, &mut errors) {
                    orders.push(order);
                }
            }
        }
        Some(_) => errors.push(FieldError::new("orders", ["orders must be an array"])),
    }

    if errors.is_empty() {
        Ok(CreateOrdersRequest { orders })
    } else {
        Err(ValidationErrors(errors))
    }
}

fn not_an_object(path: &str) -> FieldError {
    FieldError::new(
        path,
        [format!("nested property {path} must be either object or array")],
    )
}

fn validate_order(path: &str, entry: &Value, errors: &mut Vec<FieldError>) -> Option<CreateOrderDto> {
    let Value::Object(fields) = entry else {
        errors.push(not_an_object(path));
        return None;
    };

    let user_id = check_int(
        errors,
        format!("{path}.userId"),
        "userId",
        coerce_json(fields.get("userId")),
        ID_FIELD,
    );

    let items_path = format!("{path}.items");
    let items = match fields.get("items") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(
                items_path,
                ["items must be an array", "items should not be empty"],
            ));
            None
        }
        Some(Value::Array(list)) if list.is_empty() => {
            errors.push(FieldError::new(items_path, ["items should not be empty"]));
            None
        }
        Some(Value::Array(list)) => {
            let mut items = Vec::with_capacity(list.len());
            let mut all_valid = true;
            for (j, item) in list.iter().enumerate() {
                match validate_item(&format!("{items_path}.{j}"), item, errors) {
                    Some(item) => items.push(item),
                    None => all_valid = false,
                }
            }
            all_valid.then_some(items)
        }
        Some(_) => {
            errors.push(FieldError::new(items_path, ["items must be an array"]));
            None
        }
    };

    Some(CreateOrderDto {
        user_id: id(user_id?),
        items: items?,
    })
}

fn validate_item(
    path: &str,
    item: &Value,
    errors: &mut Vec<FieldError>,
) -> Option<CreateOrderItemDto> {
    let Value::Object(fields) = item else {
        errors.push(not_an_object(path));
        return None;
    };

    let product_id = check_int(
        errors,
        format!("{path}.productId"),
        "productId",
        coerce_json(fields.get("productId")),
        ID_FIELD,
    );
    let quantity = check_int(
        errors,
        format!("{path}.quantity"),
        "quantity",
        coerce_json(fields.get("quantity")),
        ID_FIELD,
    );

    Some(CreateOrderItemDto {
        product_id: id(product_id?),
        quantity: id(quantity?),
    })
}
