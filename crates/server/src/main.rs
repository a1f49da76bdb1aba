// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::State as AxumState,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use demand_matrix::{EngineConfig, PipelineOutcome, RunTicket, StructureReport};
use demand_matrix_api::{
    ApiError, CommandResponse, ControlsSnapshot, DatasetEnvelope, DemandMatrixController,
    FilterModeRequest, MatrixResponse, MonthRangeRequest, PendingRun, ToggleClientRequest,
    TogglePreferredStaffRequest, ToggleSkillRequest,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Demand Matrix Server - HTTP server for the demand matrix filtering engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a dataset envelope JSON file. If not provided, starts empty.
    #[arg(short, long)]
    dataset: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Quiet period in milliseconds before a burst of toggles is applied
    #[arg(long, default_value_t = 200)]
    debounce_ms: u64,

    /// Longest a continuous burst of toggles may defer a rerun, in
    /// milliseconds. 0 disables the cap.
    #[arg(long, default_value_t = 1000)]
    debounce_max_wait_ms: u64,

    /// Lifetime of a cached filter result in seconds
    #[arg(long, default_value_t = 60)]
    cache_ttl_secs: u64,

    /// Number of cached filter results to keep
    #[arg(long, default_value_t = 32)]
    cache_capacity: usize,
}

impl Args {
    const fn engine_config(&self) -> EngineConfig {
        let debounce_max_wait: Option<Duration> = if self.debounce_max_wait_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.debounce_max_wait_ms))
        };

        EngineConfig {
            debounce_window: Duration::from_millis(self.debounce_ms),
            debounce_max_wait,
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            cache_capacity: self.cache_capacity,
        }
    }
}

/// Application state shared across handlers.
///
/// The controller is wrapped in a Mutex so commands are applied one at a
/// time.
#[derive(Clone)]
struct AppState {
    /// The controller for the single view this server exposes.
    controller: Arc<Mutex<DemandMatrixController>>,
}

impl AppState {
    fn new(controller: DemandMatrixController) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    /// Always `ok` while the server is serving.
    status: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::DatasetDecode { .. } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: err.to_string(),
            },
            ApiError::ExportFailed { .. } | ApiError::Internal { .. } => {
                error!(error = %err, "Request failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: err.to_string(),
                }
            }
        }
    }
}

/// Handler for GET `/health` endpoint.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Handler for GET `/matrix` endpoint.
///
/// Returns the filtered dataset for the committed selection.
async fn handle_get_matrix(AxumState(app_state): AxumState<AppState>) -> Json<MatrixResponse> {
    debug!("Handling get_matrix request");
    let mut controller = app_state.controller.lock().await;
    Json(controller.matrix())
}

/// Handler for GET `/controls` endpoint.
async fn handle_get_controls(AxumState(app_state): AxumState<AppState>) -> Json<ControlsSnapshot> {
    let controller = app_state.controller.lock().await;
    Json(controller.controls())
}

/// Handler for POST `/controls/skills/toggle` endpoint.
async fn handle_toggle_skill(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ToggleSkillRequest>,
) -> Json<CommandResponse> {
    info!(skill = %req.skill, "Handling toggle_skill request");
    let mut controller = app_state.controller.lock().await;
    Json(controller.on_skill_toggle(&req.skill))
}

/// Handler for POST `/controls/clients/toggle` endpoint.
async fn handle_toggle_client(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ToggleClientRequest>,
) -> Json<CommandResponse> {
    info!(client_id = %req.client_id, "Handling toggle_client request");
    let mut controller = app_state.controller.lock().await;
    Json(controller.on_client_toggle(&req.client_id))
}

/// Handler for POST `/controls/preferred-staff/toggle` endpoint.
async fn handle_toggle_preferred_staff(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<TogglePreferredStaffRequest>,
) -> Json<CommandResponse> {
    info!(staff_id = %req.staff_id, "Handling toggle_preferred_staff request");
    let mut controller = app_state.controller.lock().await;
    Json(controller.on_preferred_staff_toggle(&req.staff_id))
}

/// Handler for POST `/controls/preferred-staff/mode` endpoint.
async fn handle_set_filter_mode(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<FilterModeRequest>,
) -> Result<Json<CommandResponse>, HttpError> {
    info!(mode = %req.mode, "Handling set_filter_mode request");
    let mut controller = app_state.controller.lock().await;
    let response: CommandResponse = controller.on_preferred_staff_filter_mode_change(&req.mode)?;
    Ok(Json(response))
}

/// Handler for POST `/controls/month-range` endpoint.
async fn handle_set_month_range(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<MonthRangeRequest>,
) -> Json<CommandResponse> {
    info!(start = req.start, end = req.end, "Handling set_month_range request");
    let mut controller = app_state.controller.lock().await;
    Json(controller.on_month_range_change(req.into()))
}

/// Handler for POST `/controls/reset` endpoint.
async fn handle_reset(AxumState(app_state): AxumState<AppState>) -> Json<CommandResponse> {
    info!("Handling reset request");
    let mut controller = app_state.controller.lock().await;
    Json(controller.on_reset())
}

/// Handler for POST `/dataset` endpoint.
///
/// Replaces the loaded dataset envelope. User selections are kept.
async fn handle_load_dataset(
    AxumState(app_state): AxumState<AppState>,
    body: String,
) -> Result<Json<CommandResponse>, HttpError> {
    info!(bytes = body.len(), "Handling load_dataset request");
    let envelope: DatasetEnvelope = DatasetEnvelope::from_json(&body)?;
    let mut controller = app_state.controller.lock().await;
    Ok(Json(controller.load_dataset(envelope)))
}

/// Handler for GET `/diagnostics` endpoint.
async fn handle_get_diagnostics(
    AxumState(app_state): AxumState<AppState>,
) -> Json<StructureReport> {
    let controller = app_state.controller.lock().await;
    Json(controller.diagnostics())
}

/// Handler for GET `/export.csv` endpoint.
async fn handle_export_csv(
    AxumState(app_state): AxumState<AppState>,
) -> Result<impl IntoResponse, HttpError> {
    info!("Handling export_csv request");
    let mut controller = app_state.controller.lock().await;
    let csv: String = controller.export_csv()?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/matrix", get(handle_get_matrix))
        .route("/controls", get(handle_get_controls))
        .route("/controls/skills/toggle", post(handle_toggle_skill))
        .route("/controls/clients/toggle", post(handle_toggle_client))
        .route(
            "/controls/preferred-staff/toggle",
            post(handle_toggle_preferred_staff),
        )
        .route("/controls/preferred-staff/mode", post(handle_set_filter_mode))
        .route("/controls/month-range", post(handle_set_month_range))
        .route("/controls/reset", post(handle_reset))
        .route("/dataset", post(handle_load_dataset))
        .route("/diagnostics", get(handle_get_diagnostics))
        .route("/export.csv", get(handle_export_csv))
        .with_state(app_state)
}

/// Commits debounced toggles once their window has elapsed.
///
/// When a commit happens the pipeline runs on a blocking thread and its
/// result is handed back to the controller, unless a newer commit has
/// superseded it in the meantime.
async fn poll_debouncer(app_state: &AppState) {
    let run: PendingRun = {
        let mut controller = app_state.controller.lock().await;
        if !controller.poll() {
            return;
        }
        controller.prepare_run()
    };

    let ticket: RunTicket = run.ticket;
    let outcome: PipelineOutcome = match tokio::task::spawn_blocking(move || run.execute()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "Filter run panicked");
            return;
        }
    };

    let mut controller = app_state.controller.lock().await;
    if !controller.complete_run(ticket, outcome) {
        debug!(
            generation = ticket.generation(),
            "Discarded result of a superseded filter run"
        );
    }
}

/// Spawns the background task that drives the debouncer.
fn spawn_debounce_poller(app_state: AppState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker: tokio::time::Interval = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            poll_debouncer(&app_state).await;
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Demand Matrix Server");

    let config: EngineConfig = args.engine_config();
    let mut controller: DemandMatrixController =
        DemandMatrixController::with_system_clock(&config)?;

    if let Some(path) = &args.dataset {
        info!("Loading dataset envelope from: {}", path);
        let json: String = tokio::fs::read_to_string(path).await?;
        controller.load_dataset(DatasetEnvelope::from_json(&json)?);
    } else {
        warn!("No dataset provided, starting empty");
    }

    let app_state: AppState = AppState::new(controller);
    let _poller: JoinHandle<()> = spawn_debounce_poller(
        app_state.clone(),
        config.debounce_window.max(Duration::from_millis(10)),
    );

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
