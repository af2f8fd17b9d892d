mod applications;
mod auth;
mod config;
mod db;
mod errors;
mod jobs;
mod models;
mod routes;
mod session;
mod state;
mod storage;
mod validation;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::applications::repository::PgApplicationRepository;
use crate::auth::users::PgUserRepository;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::jobs::repository::PgJobRepository;
use crate::routes::build_router;
use crate::session::SessionCodec;
use crate::state::AppState;
use crate::storage::{build_s3_client, S3ResumeStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first: a bad environment should fail before anything connects
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Board API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    if config.run_migrations {
        run_migrations(&db).await?;
    }

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    let resumes = S3ResumeStore::new(s3, &config);
    resumes.ensure_bucket().await?;
    info!("S3 resume store ready (bucket: {})", config.s3_bucket);

    let users = Arc::new(PgUserRepository::new(db.clone()));
    if let Some(seed) = &config.admin {
        auth::bootstrap_admin(users.as_ref(), seed, config.bcrypt_cost).await?;
    }

    auth::password::decoy_hash(config.bcrypt_cost).await?;

    let sessions = SessionCodec::new(
        &config.session_secret,
        config.session_cookie_secure,
        config.session_ttl_days,
    );

    // Build app state
    let state = AppState {
        users,
        jobs: Arc::new(PgJobRepository::new(db.clone())),
        applications: Arc::new(PgApplicationRepository::new(db)),
        resumes: Arc::new(resumes),
        sessions,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
