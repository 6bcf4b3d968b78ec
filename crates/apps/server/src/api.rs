//! JSON endpoints backing the dashboard page.
//!
//! The controller is behind an async mutex, so interaction events are
//! serviced one at a time to completion; a superseded event simply
//! recomputes and replaces the previous spec.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use charts::{BarSpec, MapSpec, TrendSpec};

use crate::AppState;

const INDEX_HTML: &str = include_str!("../assets/index.html");

fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

pub async fn index() -> Response {
    Html(INDEX_HTML).into_response()
}

pub async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaResponse {
    pub states: Vec<String>,
    pub crime_types: Vec<String>,
    pub years: Vec<u16>,
}

pub async fn get_meta(State(state): State<AppState>) -> Json<MetaResponse> {
    Json(MetaResponse {
        states: state.grid.states().to_vec(),
        crime_types: state.grid.crime_types().to_vec(),
        years: state.grid.years().to_vec(),
    })
}

pub async fn get_trend(State(state): State<AppState>) -> Json<TrendSpec> {
    let controller = state.controller.lock().await;
    Json(controller.trend().clone())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectStateRequest {
    pub state: String,
}

pub async fn select_state(
    State(state): State<AppState>,
    Json(req): Json<SelectStateRequest>,
) -> Result<Json<MapSpec>, (StatusCode, Json<Value>)> {
    let raw = req.state.trim();
    if raw != "All" && !raw.is_empty() && !state.grid.states().iter().any(|s| s == raw) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("unknown state: {raw}"),
        ));
    }

    let mut controller = state.controller.lock().await;
    let spec = controller.select_state(raw);
    Ok(Json(spec.clone()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectTypesRequest {
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectTypesResponse {
    pub spec: BarSpec,
    /// Values the checklist should be rewritten with.
    pub values: Vec<String>,
}

pub async fn select_types(
    State(state): State<AppState>,
    Json(req): Json<SelectTypesRequest>,
) -> Json<SelectTypesResponse> {
    let mut controller = state.controller.lock().await;
    let (spec, values) = controller.select_types(&req.types);
    Json(SelectTypesResponse {
        spec: spec.clone(),
        values,
    })
}
