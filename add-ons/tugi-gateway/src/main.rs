//! Axum-based chat gateway for Tugi. Config-driven via CoreConfig.

mod handlers;

use axum::extract::State;
use axum::http::{HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path as StdPath;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tugi_core::{ChatPipeline, CoreConfig, RestaurantSource, RestaurantStore, StoreBackend};
use tugi_skills::{FirestoreSource, ModelRouter};

/// Pre-flight check: config loads, restaurant store answers, port is available.
async fn run_verify() -> Result<(), String> {
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;

    print!("Checking restaurant store ({})... ", config.store_backend.as_str());
    match config.store_backend {
        StoreBackend::Sled => {
            let store = RestaurantStore::open_path(config.restaurant_store_path())
                .map_err(|e| format!("restaurant store LOCKED or inaccessible: {}", e))?;
            println!("OK ({} records)", store.count());
        }
        StoreBackend::Firestore => {
            let source = FirestoreSource::new(&config.firestore);
            let records = source
                .find(&tugi_core::Filter::default())
                .await
                .map_err(|e| format!("Firestore query failed: {}", e))?;
            println!("OK ({} records)", records.len());
        }
    }

    print!("Checking model ({})... ", config.llm_mode);
    ModelRouter::from_config(&config).map_err(|e| format!("Model router: {}", e))?;
    println!("OK");

    let port = config.port;
    print!("Checking port {}... ", port);
    let addr = format!("{}:{}", config.bind_address, port);
    match std::net::TcpListener::bind(&addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => {
            return Err(format!("Port {} BLOCKED: {}", port, e));
        }
    }

    println!("\n✅ SUCCESS: All systems GO. Ready to start gateway.");
    Ok(())
}

/// Opens the configured restaurant source. An empty Sled store is seeded from `seed_path` when set.
fn open_restaurant_source(config: &CoreConfig) -> Result<Arc<dyn RestaurantSource>, String> {
    match config.store_backend {
        StoreBackend::Sled => {
            let store = RestaurantStore::open_path(config.restaurant_store_path())
                .map_err(|e| format!("open restaurant store: {}", e))?;
            if let Some(seed_path) = config.seed_path.as_deref().filter(|_| store.count() == 0) {
                match store.seed_from_json_path(StdPath::new(seed_path)) {
                    Ok(n) => tracing::info!(target: "tugi::store", seed_path, records = n, "Seeded restaurant store"),
                    Err(e) => tracing::warn!(target: "tugi::store", seed_path, error = %e, "Failed to seed restaurant store"),
                }
            }
            tracing::info!(target: "tugi::store", records = store.count(), "Restaurant store ready (sled)");
            Ok(Arc::new(store))
        }
        StoreBackend::Firestore => {
            if config.firestore.project_id.is_empty() {
                return Err("store_backend = firestore requires firestore.project_id".to_string());
            }
            tracing::info!(
                target: "tugi::store",
                project_id = %config.firestore.project_id,
                app_id = %config.firestore.app_id,
                "Restaurant store ready (firestore)"
            );
            Ok(Arc::new(FirestoreSource::new(&config.firestore)))
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[tugi-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("❌ PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(CoreConfig::load().expect("load CoreConfig"));
    let source = match open_restaurant_source(&config) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    let model = match ModelRouter::from_config(&config) {
        Ok(model) => Arc::new(model),
        Err(e) => {
            // Live mode is useless without credentials.
            tracing::error!("GEMINI_API_KEY is not set: {}", e);
            std::process::exit(1);
        }
    };

    let pipeline = Arc::new(ChatPipeline::new(source, model));

    let app = build_app(AppState {
        config: Arc::clone(&config),
        pipeline,
    });

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("{} listening on http://{}", config.app_name, addr);
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", e);
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
}

fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);
    Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/api/v1/health", get(health))
        .route("/v1/status", get(status))
        .with_state(state)
        .layer(cors)
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) pipeline: Arc<ChatPipeline>,
}

/// GET /api/v1/health – liveness check for UI and scripts.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// GET /v1/status – app identity and wired collaborators.
async fn status(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "app_name": state.config.app_name,
        "port": state.config.port,
        "llm_mode": state.config.llm_mode,
        "model": state.pipeline.model_name(),
        "store": state.pipeline.store_name(),
    }))
}
