use dotenvy::dotenv;
use ecomm_service::config::AppConfig;
use ecomm_service::errors::StartupError;
use ecomm_service::{build_server, create_pool, DieselStorer, EcommService};

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().inspect_err(|e| log::error!("{}", e))?;
    log::debug!("loaded configuration: {:?}", config);

    let pool = create_pool(&config.db.database_url(), config.db.pool_max_size)
        .inspect_err(|e| log::error!("{}", e))?;
    log::info!(
        "Connected to database {} at {}:{}",
        config.db.name,
        config.db.host,
        config.db.port
    );

    let service =
        EcommService::new(DieselStorer::new(pool)).with_request_timeout(config.request_timeout);

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(service, &config.host, config.port)?.await?;
    Ok(())
}
