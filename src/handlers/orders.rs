use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::application::order_service::SharedOrderService;
use crate::domain::order::{CreatedOrder, OrderSubmission, UserOrders};
use crate::errors::AppError;
use crate::validation::{self, CreateOrdersRequest, GetOrdersQuery};

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserOrdersResponse {
    pub user: UserResponse,
    /// Newest first.
    pub orders: Vec<OrderResponse>,
    /// Number of orders the user has in total, regardless of the page window.
    pub total_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

impl From<UserOrders> for UserOrdersResponse {
    fn from(result: UserOrders) -> Self {
        UserOrdersResponse {
            user: UserResponse {
                id: result.user.id,
                name: result.user.name,
            },
            orders: result
                .orders
                .into_iter()
                .map(|o| OrderResponse {
                    id: o.id,
                    product_id: o.product_id,
                    quantity: o.quantity,
                })
                .collect(),
            total_count: result.total_count,
        }
    }
}

impl From<CreatedOrder> for CreatedOrderResponse {
    fn from(order: CreatedOrder) -> Self {
        CreatedOrderResponse {
            id: order.id,
            user_id: order.user_id,
            product_id: order.product_id,
            quantity: order.quantity,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// Returns one page of a user's orders, newest first, together with the total
/// number of orders the user has.
#[utoipa::path(
    get,
    path = "/orders",
    params(GetOrdersQuery),
    responses(
        (status = 200, description = "Page of the user's orders", body = UserOrdersResponse),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_orders(
    service: web::Data<SharedOrderService>,
    query: web::Query<GetOrdersQuery>,
) -> Result<HttpResponse, AppError> {
    let request = validation::validate_get_orders(&query.into_inner())?;
    let service = service.into_inner();

    let result = web::block(move || service.get_orders_by_user(request.user_id, request.page))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(UserOrdersResponse::from(result)))
}

/// POST /orders
///
/// Creates one order row per submitted item. Every referenced user is checked
/// first; either all rows are committed or none are.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrdersRequest,
    responses(
        (status = 201, description = "Rows created, in submission order", body = [CreatedOrderResponse]),
        (status = 400, description = "Invalid payload or unknown user"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_orders(
    service: web::Data<SharedOrderService>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let request = validation::validate_create_orders(&body.into_inner())?;
    let submissions: Vec<OrderSubmission> =
        request.orders.into_iter().map(OrderSubmission::from).collect();
    let service = service.into_inner();

    let created = web::block(move || service.create_orders(submissions))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<CreatedOrderResponse> =
        created.into_iter().map(CreatedOrderResponse::from).collect();
    Ok(HttpResponse::Created().json(body))
}
