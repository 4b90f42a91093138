use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use transit_planner::config::AppConfig;
use transit_planner::network::{Network, TracingLog};
use transit_planner::store::{StoreError, import_connections, load_snapshot};
use transit_planner::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let network = load_network(&config)?;
    info!(
        locations = network.location_count(),
        connections = network.connection_count(),
        connected = network.is_connected(),
        "network ready"
    );

    let addr = config.bind_addr;
    let state = AppState::new(network, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Transit planner listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET    /health                       - Health check");
    info!("  GET    /network                      - Location and connection counts");
    info!("  GET    /locations                    - List locations");
    info!("  POST   /locations                    - Add a location");
    info!("  PUT    /locations/:name              - Update a location");
    info!("  DELETE /locations/:name              - Remove a location and its connections");
    info!("  GET    /connections?source=          - List connections");
    info!("  POST   /connections                  - Add a connection");
    info!("  PUT    /connections                  - Update a connection");
    info!("  DELETE /connections?source=&destination= - Remove a connection");
    info!("  GET    /route                        - Route by criterion");
    info!("  POST   /route/preferences            - Route by preference profile");
    info!("  GET    /route/alternatives           - Routes under every criterion");
    info!("  POST   /preferences/evaluate         - Evaluate questionnaire answers");
    info!("  GET    /preferences/templates/:name  - Named preference profile");
    info!("  GET    /preferences/questions        - Questionnaire");
    info!("  GET    /history                      - Recent route searches");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Build the start-up network: a snapshot if configured, else a CSV file,
/// else an empty network.
fn load_network(config: &AppConfig) -> Result<Network, StoreError> {
    if let Some(path) = &config.snapshot_file {
        return load_snapshot(path, Arc::new(TracingLog));
    }

    let mut network = Network::with_log(Arc::new(TracingLog));
    if let Some(path) = &config.network_file {
        let file = std::fs::File::open(path)?;
        let summary = import_connections(&mut network, file)?;
        if summary.skipped > 0 {
            warn!(
                path = %path.display(),
                skipped = summary.skipped,
                "some connection rows were not imported"
            );
        }
        info!(
            path = %path.display(),
            imported = summary.imported,
            created_locations = summary.created_locations,
            "loaded connections"
        );
    }
    Ok(network)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
