use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use boundary::BoundaryGeometry;
use charts::join_mismatches;
use controls::Controller;
use dataset::IncidentTable;
use grid::CompletedGrid;

mod api;
mod fetch;

const DEFAULT_CSV_URL: &str = "https://raw.githubusercontent.com/syifahyani/MCM-Final-Project/refs/heads/main/assets/Malaysia%20Crime%20District.csv";
const DEFAULT_GEOJSON_URL: &str = "https://raw.githubusercontent.com/syifahyani/MCM-Final-Project/refs/heads/main/assets/malaysia_state.geojson";

#[derive(Clone)]
pub struct AppState {
    pub grid: Arc<CompletedGrid>,
    pub controller: Arc<Mutex<Controller>>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr: SocketAddr = env::var("DASH_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse()
        .expect("invalid DASH_ADDR");
    let csv_url = env::var("CRIME_CSV_URL").unwrap_or_else(|_| DEFAULT_CSV_URL.to_string());
    let geojson_url =
        env::var("CRIME_GEOJSON_URL").unwrap_or_else(|_| DEFAULT_GEOJSON_URL.to_string());

    let (grid, boundaries) = match load_data(&csv_url, &geojson_url).await {
        Ok(loaded) => loaded,
        Err(err) => {
            error!("startup load failed: {err}");
            std::process::exit(1);
        }
    };

    let grid = Arc::new(grid);
    let boundaries = Arc::new(boundaries);

    let mismatch = join_mismatches(&grid, &boundaries);
    if !mismatch.is_empty() {
        debug!(
            "state name mismatch between sources: {:?} have no geometry, {:?} have no counts",
            mismatch.without_geometry, mismatch.without_counts
        );
    }

    info!(
        "completed grid: {} states x {} categories x {} years = {} rows",
        grid.states().len(),
        grid.categories().len(),
        grid.years().len(),
        grid.rows().len()
    );

    let controller = Controller::new(grid.clone(), boundaries);
    let state = AppState {
        grid,
        controller: Arc::new(Mutex::new(controller)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    let app = Router::new()
        .route("/", get(api::index))
        .route("/healthz", get(api::healthz))
        .route("/api/meta", get(api::get_meta))
        .route("/api/trend", get(api::get_trend))
        .route("/api/select/state", post(api::select_state))
        .route("/api/select/types", post(api::select_types))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("dashboard listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

/// Fetch and parse both sources, then complete the grid. Any failure is
/// fatal: no retries, no partial-data mode.
async fn load_data(
    csv_url: &str,
    geojson_url: &str,
) -> Result<(CompletedGrid, BoundaryGeometry), String> {
    let client = reqwest::Client::new();

    let csv_text = fetch::fetch_text(&client, csv_url)
        .await
        .map_err(|e| format!("incident CSV: {e}"))?;
    let table =
        IncidentTable::from_csv_str(&csv_text).map_err(|e| format!("incident CSV: {e}"))?;
    if table.is_empty() {
        return Err("incident CSV: no data rows".to_string());
    }
    info!("loaded {} incident records", table.len());

    let geojson_text = fetch::fetch_text(&client, geojson_url)
        .await
        .map_err(|e| format!("state boundaries: {e}"))?;
    let boundaries = BoundaryGeometry::from_geojson_str(&geojson_text)
        .map_err(|e| format!("state boundaries: {e}"))?;
    info!("loaded {} state boundaries", boundaries.len());

    Ok((CompletedGrid::complete(table.records), boundaries))
}
