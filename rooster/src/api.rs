use actix_cors::Cors;
use actix_web::{
    dev::Server,
    web::{self, Data, Json},
    App, HttpServer,
};

use serde::Serialize;

use domain_db::db::PostgresRepository;

mod annotations;
mod cves;
mod error;
mod identity;
mod response;
mod telemetry;
mod users;
mod validation;

pub use telemetry::init_logger;

use error::ApplicationError;

pub struct ApiConfig {
    pub address: String,
    pub port: u16,
    pub repository: PostgresRepository,
}

pub fn run(api_config: ApiConfig) -> Result<Server, anyhow::Error> {
    let application_ctx = Data::new(ApplicationContext {
        repository: api_config.repository,
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(application_ctx.clone())
            .app_data(json_config())
            .app_data(query_config())
            .route("/health_check", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/cve")
                            .route("/list", web::get().to(cves::list))
                            .route("/detail/{cve_id}", web::get().to(cves::detail))
                            .route("/filter_context", web::get().to(cves::filter_context))
                            .route(
                                "/save_user_keyword",
                                web::post().to(annotations::save_user_keyword),
                            )
                            .route(
                                "/delete_user_keyword",
                                web::delete().to(annotations::delete_user_keyword),
                            )
                            .route(
                                "/save_user_cve_comment",
                                web::post().to(annotations::save_user_cve_comment),
                            )
                            .route(
                                "/delete_user_cve_comment",
                                web::delete().to(annotations::delete_user_cve_comment),
                            )
                            .route(
                                "/save_user_cve_label",
                                web::post().to(annotations::save_user_cve_label),
                            )
                            .route(
                                "/delete_user_cve_label",
                                web::delete().to(annotations::delete_user_cve_label),
                            ),
                    )
                    .service(
                        web::scope("/user")
                            .route("/keywords", web::get().to(users::keywords))
                            .route("/settings", web::get().to(users::settings))
                            .route("/settings", web::post().to(users::save_settings)),
                    ),
            )
            .wrap(Cors::permissive())
            .wrap(tracing_actix_web::TracingLogger::default())
    })
    .bind((api_config.address, api_config.port))?
    .run();
    Ok(server)
}

// Malformed payloads and query strings get the same envelope as field
// validation failures.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApplicationError::Validation(vec![err.to_string()]).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApplicationError::Validation(vec![err.to_string()]).into())
}

pub struct ApplicationContext {
    repository: PostgresRepository,
}

impl ApplicationContext {
    pub fn get_repository(&self) -> &PostgresRepository {
        &self.repository
    }
}

#[derive(Debug, Serialize)]
struct HealthCheck<'a> {
    version: &'a str,
}

async fn health_check() -> Json<HealthCheck<'static>> {
    Json(HealthCheck {
        version: crate::version(),
    })
}
