use record_portal::{
    AppState, ResourceContext,
    config::{AppConfig, Env},
    create_router,
    schema::{PRODUCT_SCHEMA, USER_SCHEMA},
    store::{PostgresRecordStore, RecordStore, StoreState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point, responsible for initializing all core
/// components: configuration, logging, the document store connection, and the
/// HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & environment loading (fail-fast).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging filter setup. RUST_LOG wins, with sensible defaults for
    // local development.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "record_portal=debug,tower_http=info,axum=trace".into());

    // 3. Initialize logging based on environment.
    match config.env {
        Env::Local => {
            // LOCAL: pretty print for human readability while debugging.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON output for ingestion by centralized log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Store initialization (Postgres). One connection pool, shared by the
    // per-resource store handles; pooling discipline lives entirely here.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    let users_store = PostgresRecordStore::new(pool.clone(), "users");
    let products_store = PostgresRecordStore::new(pool, "products");

    // LOCAL-ONLY: provision the backing tables if missing. A development
    // convenience; production schemas are managed outside the process.
    if config.env == Env::Local {
        users_store
            .ensure_collection()
            .await
            .expect("FATAL: failed to provision users collection");
        products_store
            .ensure_collection()
            .await
            .expect("FATAL: failed to provision products collection");
    }

    // 5. Unified state assembly: one parametric controller context per
    // resource collection, schemas declared statically.
    let state = AppState {
        users: ResourceContext {
            schema: &USER_SCHEMA,
            store: Arc::new(users_store) as StoreState,
        },
        products: ResourceContext {
            schema: &PRODUCT_SCHEMA,
            store: Arc::new(products_store) as StoreState,
        },
        config: config.clone(),
    };

    // 6. Router and server startup.
    let app = create_router(state);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("FATAL: failed to bind HTTP listener");

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on 0.0.0.0:{}", config.port);
    tracing::info!(
        "API Documentation (Swagger UI) available at: http://localhost:{}/swagger-ui",
        config.port
    );

    axum::serve(listener, app).await.unwrap();
}
