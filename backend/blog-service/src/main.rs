use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_service::config::Config;
use blog_service::db::{create_pool, run_migrations, PgPostStore, PgUserStore};
use blog_service::routes::configure_routes;
use blog_service::security::jwt;
use blog_service::services::oauth::google::GoogleOAuthProvider;
use blog_service::services::{PostService, UploadStore, UserService};
use blog_service::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));

    // A bad signing secret is fatal here, never per-request
    jwt::initialize_secret(&config.jwt.secret).expect("Failed to initialize JWT secret");
    tracing::info!("JWT secret initialized");

    // Create database connection pool and run migrations
    let pool = create_pool(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to create database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!(
        "Database pool created with {} max connections",
        config.database.max_connections
    );

    let uploads = UploadStore::new(&config.uploads.dir);
    uploads
        .ensure_dir()
        .await
        .expect("Failed to create uploads directory");

    // Google OAuth is optional: without credentials the federated-login
    // endpoints report it as unconfigured, password login is unaffected.
    let oauth = match GoogleOAuthProvider::from_config(&config.oauth) {
        Ok(provider) => Some(provider),
        Err(e) => {
            tracing::warn!("Google OAuth disabled: {}", e);
            None
        }
    };

    let user_store = Arc::new(PgUserStore::new(pool.clone()));
    let post_store = Arc::new(PgPostStore::new(pool.clone()));

    let state = web::Data::new(AppState {
        users: UserService::new(user_store, post_store.clone()),
        posts: PostService::new(post_store),
        oauth,
        uploads,
    });

    let allowed_origins = config.cors.allowed_origins.clone();
    let bind_address = format!("{}:{}", config.app.host, config.app.port);

    tracing::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let cors = if allowed_origins.trim() == "*" {
            Cors::permissive()
        } else {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["authorization", "content-type", "accept"])
                .max_age(3600);
            for origin in allowed_origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
            {
                cors = cors.allowed_origin(origin);
            }
            cors
        };

        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
