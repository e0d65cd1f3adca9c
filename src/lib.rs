pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod models;
pub mod query;
pub mod schema;

use std::error::Error;
use std::path::Path;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::http::header;
use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{
    embed_migrations, EmbeddedMigrations, FileBasedMigrations, MigrationHarness,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::{AccountService, CredentialService};
use infrastructure::{DieselRepository, ImageStore};

pub use config::AppConfig;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Account operations backed by Postgres.
pub type Accounts = AccountService<DieselRepository>;

type MigrationError = Box<dyn Error + Send + Sync + 'static>;

/// Run any pending Diesel migrations against the pool's database.
///
/// With `root` set, migrations are read from that directory instead of the
/// set embedded at build time.
pub fn run_migrations(pool: &DbPool, root: Option<&Path>) -> Result<(), MigrationError> {
    let mut conn = pool.get()?;
    let applied = match root {
        Some(root) => conn.run_pending_migrations(FileBasedMigrations::from_path(root)?)?,
        None => conn.run_pending_migrations(MIGRATIONS)?,
    };
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Everything the HTTP layer shares across workers.
#[derive(Clone)]
pub struct AppContext {
    pub repository: DieselRepository,
    pub credentials: CredentialService,
    pub images: ImageStore,
    pub cors_origin: String,
}

impl AppContext {
    pub fn new(pool: DbPool, config: &AppConfig) -> Self {
        Self {
            repository: DieselRepository::new(pool, &config.domain),
            credentials: CredentialService::new(&config.jwt_secret, config.bcrypt_cost),
            images: ImageStore::new(&config.upload_dir),
            cors_origin: config.cors_origin.clone(),
        }
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    context: AppContext,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    std::fs::create_dir_all(context.images.root())?;

    let repository = web::Data::new(context.repository.clone());
    let credentials = web::Data::new(context.credentials.clone());
    let images = web::Data::new(context.images.clone());
    let accounts = web::Data::new(Accounts::new(
        context.repository.clone(),
        context.credentials.clone(),
    ));
    let cors_origin = context.cors_origin;

    Ok(HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials();

        App::new()
            .app_data(repository.clone())
            .app_data(credentials.clone())
            .app_data(images.clone())
            .app_data(accounts.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", handlers::ApiDoc::openapi()),
            )
            .service(Files::new("/uploads", images.root()))
            .configure(handlers::routes)
    })
    .bind((host.to_string(), port))?
    .run())
}
