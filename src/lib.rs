pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod seed;
pub mod validation;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_service::OrderService;
use domain::ports::OrderRepository;
use errors::AppError;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool, DbSetupError};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::get_orders,
        handlers::orders::create_orders,
        handlers::health::health
    ),
    components(schemas(
        validation::CreateOrdersRequest,
        validation::CreateOrderDto,
        validation::CreateOrderItemDto,
        handlers::orders::UserOrdersResponse,
        handlers::orders::UserResponse,
        handlers::orders::OrderResponse,
        handlers::orders::CreatedOrderResponse
    )),
    tags((name = "orders", description = "Order history per user"))
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), DbSetupError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbSetupError::Migrations(e.to_string()))?;
    Ok(())
}

/// Routes and extractor settings. Expects a `web::Data<SharedOrderService>`
/// to be registered on the app.
///
/// [`SharedOrderService`]: application::order_service::SharedOrderService
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Malformed request body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Malformed query string: {err}")).into()
    }))
    .route("/health", web::get().to(handlers::health::health))
    .service(
        web::scope("/orders")
            .route("", web::get().to(handlers::orders::get_orders))
            .route("", web::post().to(handlers::orders::create_orders)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let repo: Arc<dyn OrderRepository> = Arc::new(DieselOrderRepository::new(pool));
    let service = web::Data::new(OrderService::new(repo));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .configure(configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
