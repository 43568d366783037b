//! Service entry-point: loads settings, prepares the database and serves
//! the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServiceSettings, create_server};
use user_service::inbound::http::health::HealthState;
use user_service::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load service settings")?;
    let database_url = settings.database_url()?.to_owned();

    if settings.run_migrations {
        run_pending_migrations(&database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
    }

    let mut pool_config = PoolConfig::new(database_url);
    if let Some(max_size) = settings.pool_max_size {
        pool_config = pool_config.with_max_size(max_size);
    }
    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")?;

    let bind_addr = settings.bind_addr()?;
    let config = ServerConfig::new(bind_addr, pool, settings.provider_base_url()?)
        .with_provider_timeout(settings.provider_timeout())
        .with_policy(settings.empty_observation_policy()?);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start HTTP server")?;
    info!(%bind_addr, "user service listening");
    server.await.wrap_err("HTTP server terminated with an error")
}
