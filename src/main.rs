use dotenvy::dotenv;
use order_api::config::Settings;
use order_api::{build_server, create_pool, run_migrations};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env()?;

    let pool = create_pool(&settings.database_url, settings.pool_size)?;
    run_migrations(&pool)?;

    log::info!(
        "Order API running at http://{}:{}",
        settings.host,
        settings.port
    );

    build_server(pool, &settings.host, settings.port)?.await?;
    Ok(())
}
