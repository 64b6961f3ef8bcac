use std::net::SocketAddr;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use schedule_server::catalog::{CatalogConfig, DEFAULT_COUNTRY_CODE};
use schedule_server::rasp::{MockRaspClient, RaspClient, RaspConfig, RaspProvider};
use schedule_server::schedule::ScheduleConfig;
use schedule_server::web::{AppState, create_router};

const DEFAULT_BIND: &str = "127.0.0.1:3000";

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Mock data when `RASP_MOCK_DIR` is set, the live API otherwise.
fn build_provider() -> RaspProvider {
    if let Ok(dir) = std::env::var("RASP_MOCK_DIR") {
        let client = MockRaspClient::new(&dir).expect("Failed to load mock data");
        info!(dir = %dir, countries = client.country_count(), "Serving mock Rasp data");
        return RaspProvider::Mock(client);
    }

    let api_key = std::env::var("RASP_API_KEY").unwrap_or_else(|_| {
        warn!("RASP_API_KEY not set. API calls will fail.");
        String::new()
    });

    let mut config = RaspConfig::new(api_key);
    if let Ok(url) = std::env::var("RASP_BASE_URL") {
        config = config.with_base_url(url);
    }

    RaspProvider::Live(RaspClient::new(config).expect("Failed to create Rasp client"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let provider = build_provider();

    let default_country =
        std::env::var("CATALOG_DEFAULT_COUNTRY").unwrap_or_else(|_| DEFAULT_COUNTRY_CODE.to_string());
    let catalog_config = CatalogConfig::new(default_country)
        .with_retry_failed_loads(env_flag("CATALOG_RETRY_FAILED"));

    let state = AppState::new(provider, catalog_config, ScheduleConfig::default());

    // Warm the catalog in the background; requests that arrive first wait
    // on the same load.
    let catalog = state.catalog.clone();
    tokio::spawn(async move {
        if let Err(e) = catalog.load().await {
            error!(error = %e, "Initial station catalog load failed");
        }
    });

    let app = create_router(state);

    let bind = std::env::var("SCHEDULE_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let addr: SocketAddr = bind.parse().expect("SCHEDULE_BIND must be host:port");

    info!(%addr, "Schedule server listening");
    info!("API endpoints:");
    info!("  GET  /health                     - Health check");
    info!("  GET  /api/catalog/status         - Station catalog state");
    info!("  POST /api/catalog/reset          - Retry a failed catalog load");
    info!("  GET  /api/countries              - Full station tree");
    info!("  GET  /api/cities?q=&country=     - Search cities");
    info!("  GET  /api/cities/:code/stations  - Stations of a city");
    info!("  GET  /api/segments?from=&to=     - Route search");
    info!("  GET  /api/segments/:uid/carrier  - Carrier of a found segment");
    info!("  GET  /api/carriers/:code         - Carrier details");
    info!("  GET  /api/threads/:uid           - Thread stops");
    info!("  GET  /api/stations/:code/thread  - First thread from a station");
    info!("  GET  /api/copyright              - Data attribution");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
