use axum::{Router, http::HeaderName, routing::get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod config;
pub mod error;
pub mod handlers;
pub mod id;
pub mod schema;
pub mod store;

// Module for routing (thin method + path binding).
pub mod routes;
use routes::records;

// --- Public Re-exports ---

// Makes core state types easily accessible to the application entry point (main.rs).
pub use config::AppConfig;
pub use schema::ResourceSchema;
pub use store::{MemoryRecordStore, PostgresRecordStore, StoreState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the service
/// from the `#[utoipa::path]` annotations on the controller operations. The
/// documented paths show the /users collection; /products exposes the same
/// five operations with its own field schema. Served at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_record,
        handlers::list_records,
        handlers::get_record,
        handlers::update_record,
        handlers::delete_record,
    ),
    tags(
        (name = "records", description = "Document-shaped record CRUD API")
    )
)]
struct ApiDoc;

/// ResourceContext
///
/// Everything one resource collection's controller needs: the declared field
/// schema and the store handle. Constructed once at process start and passed
/// in explicitly (dependency injection), never reached as ambient state, so
/// tests can substitute any `RecordStore` implementation. Controllers hold no
/// state of their own across requests.
#[derive(Clone)]
pub struct ResourceContext {
    pub schema: &'static ResourceSchema,
    pub store: StoreState,
}

/// AppState
///
/// The single container holding all initialized services: one context per
/// resource collection plus the immutable configuration. Shared across all
/// incoming requests.
#[derive(Clone)]
pub struct AppState {
    pub users: ResourceContext,
    pub products: ResourceContext,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

/// create_router
///
/// Assembles the application's entire routing structure, applies the
/// observability layers, and registers the per-resource state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // GET /health
        // Unauthenticated endpoint for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // The two resource collections, one parametric router instantiated
        // twice with different schemas and stores.
        .merge(records::record_routes("/users", state.users))
        .merge(records::record_routes("/products", state.products));

    // 3. Observability and Correlation Layers (applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response lifecycle in
                // a span carrying the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer (cross-origin policy is deliberately wide open here;
        // tightening origins is an operational concern outside the core).
        .layer(cors)
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to customize span creation. Extracts the
/// `x-request-id` header (if present) and includes it in the structured
/// logging metadata alongside the HTTP method and URI, so every log line for
/// a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
