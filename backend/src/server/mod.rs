//! Server construction and middleware wiring.

mod config;
mod settings;

pub use config::ServerConfig;
pub use settings::ServiceSettings;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use user_service::Trace;
#[cfg(debug_assertions)]
use user_service::doc::ApiDoc;
use user_service::domain::{ChangeEventBuilder, UserProfileService, UserReconciliationService};
use user_service::inbound::http::health::{HealthState, live, ready};
use user_service::inbound::http::state::HttpState;
use user_service::inbound::http::users::{produce_user_info, update_user};
use user_service::inbound::http::validation::json_config;
use user_service::outbound::persistence::DieselUserRepository;
use user_service::outbound::provider::{HttpIdentityProvider, HttpIdentityProviderConfig};

fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let users = Arc::new(DieselUserRepository::new(config.db_pool.clone()));
    let provider = HttpIdentityProvider::new(
        HttpIdentityProviderConfig::new(config.provider_base_url.clone())
            .with_timeout(config.provider_timeout),
    )
    .map_err(std::io::Error::other)?;

    let profile = UserProfileService::new(users.clone());
    let reconciliation =
        UserReconciliationService::new(users, Arc::new(provider), ChangeEventBuilder::default())
            .with_policy(config.policy);
    Ok(HttpState::new(Arc::new(profile), Arc::new(reconciliation)))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(update_user)
        .service(produce_user_info)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when the provider client cannot be built or
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
