//! AppRole Platform Server
//!
//! Serves the application roles API:
//! - Role CRUD under `/api/server/v1/applications/{applicationId}/roles`
//! - Assigned users and groups, patched with SCIM-style operations
//! - Health probes under `/health`
//!
//! ## Configuration
//!
//! Read from a TOML file (`APPROLE_CONFIG`, `config.toml`, `approle.toml`, ...)
//! and overridden by environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `APPROLE_HTTP_PORT` | `8080` | HTTP API port |
//! | `APPROLE_STORE_TYPE` | `mongodb` | `mongodb` or `memory` |
//! | `APPROLE_MONGODB_URI` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `APPROLE_MONGODB_DATABASE` | `approle` | MongoDB database name |
//! | `APPROLE_DIRECTORY_PUBLIC_URL` | `https://localhost:9443` | Base of `$ref` URIs |
//! | `APPROLE_DEV_MODE` | `false` | Seed development data |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;
use axum::{http::HeaderValue, Router};
use utoipa_axum::router::OpenApiRouter;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use anyhow::Result;
use tracing::{info, warn};
use tokio::{signal, net::TcpListener};
use utoipa_swagger_ui::SwaggerUi;

use ar_config::{AppConfig, StoreType};
use ar_platform::shared::{health_router, HealthState};
use ar_platform::{
    roles_router, DevDataSeeder, InMemoryRoleStore, MongoRoleStore, ReferenceResolver,
    RoleStore, RolesState, ServerUrlBuilder, APPLICATIONS_BASE_PATH,
};

#[tokio::main]
async fn main() -> Result<()> {
    ar_common::logging::init_logging("ar-platform-server");

    info!("Starting AppRole Platform Server");

    let config = AppConfig::load()?;

    // Role store
    let (store, db): (Arc<dyn RoleStore>, Option<mongodb::Database>) = match config.store.store_type {
        StoreType::Mongodb => {
            info!("Connecting to MongoDB: {}/{}", config.mongodb.uri, config.mongodb.database);
            let client = mongodb::Client::with_uri_str(&config.mongodb.uri).await?;
            let db = client.database(&config.mongodb.database);
            (Arc::new(MongoRoleStore::new(&db)), Some(db))
        }
        StoreType::Memory => {
            warn!("Using in-memory role store; data is lost on shutdown");
            let store = if config.dev_mode {
                InMemoryRoleStore::new().with_dev_directory()
            } else {
                InMemoryRoleStore::new()
            };
            (Arc::new(store), None)
        }
    };

    // Seed development data if in dev mode
    if config.dev_mode {
        let seeder = match &db {
            Some(db) => DevDataSeeder::new(db.clone()),
            None => DevDataSeeder::roles_only(),
        };
        if let Err(e) = seeder.seed(store.as_ref()).await {
            warn!("Dev data seeding skipped: {}", e);
        }
    }

    // Directory references
    let urls = Arc::new(ServerUrlBuilder::new(
        config.directory.public_url.clone(),
        config.directory.legacy_server_url.clone(),
        config.directory.endpoint_path.clone(),
    ));
    let resolver = Arc::new(ReferenceResolver::new(urls));
    info!("Directory references use {}", resolver.directory_base(ar_platform::directory::SUPER_TENANT_DOMAIN));

    let roles_state = RolesState::new(store, resolver);
    let health_state = HealthState::new(db, Some(env!("CARGO_PKG_VERSION").to_string()));

    // Build API router using OpenApiRouter for auto-collected OpenAPI paths
    let (router, mut openapi) = OpenApiRouter::new()
        .nest(APPLICATIONS_BASE_PATH, roles_router(roles_state))
        .split_for_parts();

    openapi.info.title = "AppRole Platform API".to_string();
    openapi.info.version = "1.0.0".to_string();
    openapi.info.description = Some("Application roles and role assignment".to_string());

    let app = Router::new()
        .merge(router)
        .nest("/health", health_router(health_state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", openapi))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.http.cors_origins));

    let api_addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&api_addr).await?;
    info!("API server listening on http://{}", api_addr);

    health_state.set_ready();
    info!("AppRole Platform Server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("AppRole Platform Server shutdown complete");
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
