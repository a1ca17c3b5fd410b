//! TourneyHub server
//!
//! Main application entry point

use tracing::info;

use TourneyHub::{
    config::Settings,
    database::{self, DatabaseService},
    handlers::{self, AppState},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard must outlive the server
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", TourneyHub::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = database::create_pool(&settings.database).await?;
    database::run_migrations(&pool).await?;

    let db = DatabaseService::new(pool.clone());

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(&settings, &db)?;

    let state = AppState { pool, db, services };
    let app = handlers::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("TourneyHub listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    info!("TourneyHub has been shut down.");

    Ok(())
}
