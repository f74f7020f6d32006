use hangar::server::{
    config::Config, integration::Integrations, model::app::AppState, router,
    scheduler::Scheduler, startup,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    dotenvy::dotenv().ok();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let integrations =
        Integrations::new(config.integrations.clone()).expect("Failed to build HTTP client");
    let session = startup::connect_to_session(&config)
        .await
        .expect("Failed to connect to Valkey");
    let db = startup::connect_to_database(&config)
        .await
        .expect("Failed to connect to database");

    Scheduler::new(db.clone(), integrations.clone())
        .await
        .expect("Failed to create scheduler")
        .start()
        .await
        .expect("Failed to start scheduler");

    let app = router::routes()
        .with_state(AppState {
            db,
            integrations,
            app_url: config.app_url.clone(),
        })
        .layer(session);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Starting server on {}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
