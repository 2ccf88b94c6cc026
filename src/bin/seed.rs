use dotenvy::dotenv;
use order_api::config::Settings;
use order_api::seed::{seed_users, DEFAULT_USERS};
use order_api::{create_pool, run_migrations};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env()?;
    let pool = create_pool(&settings.database_url, 1)?;
    run_migrations(&pool)?;

    let mut conn = pool.get()?;
    let inserted = seed_users(&mut conn, DEFAULT_USERS)?;

    log::info!(
        "Seeded {} of {} users ({} already present)",
        inserted,
        DEFAULT_USERS.len(),
        DEFAULT_USERS.len() - inserted
    );
    Ok(())
}
