// Report Desk - Web Server
// JSON API over both flows with Axum

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use report_desk::pets::{parse_id, SearchInput, ALL_PETS};
use report_desk::{LocationLoader, LocationReport, MongoPetStore, PetDesk, Settings, UpdateOutcome};

/// Shared application state
#[derive(Clone)]
struct AppState {
    settings: Arc<Settings>,
    loader: Arc<Mutex<LocationLoader>>,
    desk: Arc<Mutex<PetDesk<MongoPetStore>>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

fn reply<T: Serialize>(result: Result<T, (StatusCode, String)>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        Err((status, message)) => (status, Json(ApiResponse::<T>::failed(message))).into_response(),
    }
}

fn internal(message: impl ToString) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
}

/// Run `work` on the blocking pool; both flows use blocking clients
async fn blocking<T, F>(work: F) -> Result<T, (StatusCode, String)>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, (StatusCode, String)> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(internal)?
}

#[derive(Debug, Deserialize)]
struct LocationsQuery {
    #[serde(default)]
    details: bool,
}

#[derive(Debug, Deserialize)]
struct PetsQuery {
    #[serde(default)]
    name: String,
    #[serde(default)]
    pet_text: String,
    #[serde(default)]
    pet: Option<String>,
}

impl From<PetsQuery> for SearchInput {
    fn from(query: PetsQuery) -> Self {
        Self {
            search_name: query.name,
            search_pet_text: query.pet_text,
            selected_pet: query.pet.unwrap_or_else(|| ALL_PETS.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateRequest {
    name: String,
    pet: String,
}

#[derive(Serialize)]
struct UpdateResponse {
    outcome: UpdateOutcome,
    message: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/locations?details=bool - Store locations report
async fn get_locations(
    State(state): State<AppState>,
    Query(query): Query<LocationsQuery>,
) -> Response {
    let result = blocking(move || {
        let mut loader = state.loader.lock().map_err(|_| internal("loader lock poisoned"))?;
        let table = loader
            .load(&state.settings.locations.url, state.settings.locations.nrows)
            .map_err(|e| {
                error!(error = %e, "loading locations failed");
                (StatusCode::BAD_GATEWAY, format!("Loading locations failed: {}", e))
            })?;

        Ok(LocationReport::build(&table, query.details))
    })
    .await;

    reply(result)
}

/// GET /api/pets?name=&pet_text=&pet= - Search pet records
async fn get_pets(State(state): State<AppState>, Query(query): Query<PetsQuery>) -> Response {
    let input = SearchInput::from(query);

    let result = blocking(move || {
        let mut desk = state.desk.lock().map_err(|_| internal("desk lock poisoned"))?;
        desk.search(&input)
            .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))
    })
    .await;

    reply(result)
}

/// PUT /api/pets/:id - Overwrite name and pet of one record
async fn update_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRequest>,
) -> Response {
    let result = blocking(move || {
        let mut desk = state.desk.lock().map_err(|_| internal("desk lock poisoned"))?;
        let outcome = desk.update(&parse_id(&id), &request.name, &request.pet);

        let status = match outcome {
            UpdateOutcome::Updated | UpdateOutcome::NoChange => StatusCode::OK,
            UpdateOutcome::Failed(_) => StatusCode::BAD_GATEWAY,
            UpdateOutcome::NoConnection => StatusCode::SERVICE_UNAVAILABLE,
        };
        let message = outcome.notice().text;

        if status == StatusCode::OK {
            info!(id = %id, outcome = ?outcome, "update request served");
            Ok(UpdateResponse { outcome, message })
        } else {
            Err((status, message))
        }
    })
    .await;

    reply(result)
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("🌐 Report Desk - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let settings = Settings::load(None)?;

    // Connecting blocks until the driver is ready
    let secrets = settings.mongo.clone();
    let desk = tokio::task::spawn_blocking(move || PetDesk::open(secrets.as_ref())).await?;
    match desk.diagnostic() {
        Some(diagnostic) => println!("{}", diagnostic),
        None => println!("✓ Document store connected"),
    }

    // Create shared state
    let state = AppState {
        settings: Arc::new(settings),
        loader: Arc::new(Mutex::new(LocationLoader::new())),
        desk: Arc::new(Mutex::new(desk)),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/locations", get(get_locations))
        .route("/pets", get(get_pets))
        .route("/pets/:id", put(update_pet))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: http://localhost:3000/api/locations");
    println!("        http://localhost:3000/api/pets");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;
    Ok(())
}
