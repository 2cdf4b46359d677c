use quire::bootstrap;
use quire::config::Config;
use quire::infrastructure::http::router::build_router;
use quire::infrastructure::observability;
use quire::infrastructure::persistence::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing and metrics
    let _observability = observability::init(&config)?;
    tracing::info!("Configuration loaded");

    // Initialize database connection
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connection established");

    // Run migrations
    db.run_migrations().await?;
    tracing::info!("Database migrations applied");

    // Ensure the fallback workspace exists
    if let Err(e) = bootstrap::initialize_default_workspace(&db, &config).await {
        tracing::error!("Failed to initialize default workspace: {}", e);
        return Err(e.into());
    }

    let state = bootstrap::build_app_state(db, &config);
    let app = build_router(state);

    // Start server
    let addr = config.server_address();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
