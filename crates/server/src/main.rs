//! Critika server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use critika_api::{middleware::AppState, router as api_router};
use critika_common::Config;
use critika_core::{
    AuthService, CatalogService, CommentService, EmailService, ReviewService, UserService,
};
use critika_db::repositories::{
    CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleRepository,
    UserCodeRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "critika=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting critika server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = critika_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    critika_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let code_repo = UserCodeRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let genre_repo = GenreRepository::new(Arc::clone(&db));
    let title_repo = TitleRepository::new(Arc::clone(&db));
    let review_repo = ReviewRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));

    // Initialize services
    let email_service =
        EmailService::new(config.email.as_ref(), config.server.instance_name.clone())?;
    if email_service.is_enabled() {
        info!("Email delivery enabled");
    } else {
        info!("Email delivery not configured; confirmation codes will be logged");
    }

    let auth_service = AuthService::new(
        user_repo.clone(),
        code_repo,
        email_service,
        config.auth.clone(),
    );
    let catalog_service = CatalogService::new(
        category_repo,
        genre_repo,
        title_repo.clone(),
        review_repo.clone(),
    );
    let review_service = ReviewService::new(review_repo.clone(), title_repo, user_repo.clone());
    let comment_service = CommentService::new(comment_repo, review_repo, user_repo.clone());
    let user_service = UserService::new(user_repo);

    // Create app state
    let state = AppState {
        auth_service,
        catalog_service,
        review_service,
        comment_service,
        user_service,
    };

    // Build router
    let app = Router::new()
        .nest("/v1", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            critika_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
