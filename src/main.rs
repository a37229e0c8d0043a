use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use warehouse_products::config::ServerConfig;
use warehouse_products::db::{establish_connection_pool, run_pending_migrations};
use warehouse_products::repository::DieselRepository;
use warehouse_products::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_pending_migrations(&pool) {
        log::error!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    let repo = DieselRepository::new(pool);

    log::info!("Listening on {}:{}", config.address, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
            .app_data(web::Data::new(repo.clone()))
    })
    .bind((config.address, config.port))?
    .run()
    .await
}
