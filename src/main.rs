use axum::{http::HeaderValue, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod services;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();
    tracing::info!("Starting Carelink API in {:?} mode", config.environment);

    // Apply pending schema migrations; a cold store is not fatal, /health
    // will report it
    if let Err(e) = database::manager::DatabaseManager::migrate().await {
        tracing::warn!("Could not run migrations: {}", e);
    }

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Carelink API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_routes())
        // Protected API
        .merge(patient_routes())
        .merge(doctor_routes())
        .merge(mapping_routes())
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
}

fn patient_routes() -> Router {
    use axum::routing::post;
    use handlers::patients;

    Router::new()
        .route("/api/patients", post(patients::create).get(patients::list))
        .route(
            "/api/patients/:id",
            get(patients::get)
                .put(patients::update)
                .delete(patients::delete),
        )
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn doctor_routes() -> Router {
    use axum::routing::post;
    use handlers::doctors;

    Router::new()
        .route("/api/doctors", post(doctors::create).get(doctors::list))
        .route(
            "/api/doctors/:id",
            get(doctors::get)
                .put(doctors::update)
                .delete(doctors::delete),
        )
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn mapping_routes() -> Router {
    use axum::routing::{delete, post};
    use handlers::mappings;

    Router::new()
        .route("/api/mappings", post(mappings::create).get(mappings::list))
        .route(
            "/api/mappings/patient/:patient_id",
            get(mappings::doctors_for_patient),
        )
        .route("/api/mappings/delete/:id", delete(mappings::delete))
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let security = &config::config().security;

    if !security.enable_cors {
        return CorsLayer::new();
    }

    // Development stays wide open for local clients on arbitrary ports
    if crate::is_development!() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "message": "Welcome to Healthcare API",
        "name": "Carelink API",
        "version": version,
        "endpoints": {
            "auth": "/api/auth/register, /api/auth/login (public)",
            "patients": "/api/patients[/:id] (protected)",
            "doctors": "/api/doctors[/:id] (protected)",
            "mappings": "/api/mappings, /api/mappings/patient/:patient_id, /api/mappings/delete/:id (protected)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
