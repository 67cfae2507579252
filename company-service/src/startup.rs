use crate::config::CompanyConfig;
use crate::handlers;
use crate::services::{seed_companies, seed_dataset, CompanyStore, MongoDb, SeedReport};
use axum::{middleware, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CompanyStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CompanyStore>) -> Self {
        Self { store }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/companies", get(handlers::list_companies))
        .route("/companies/id/:id", get(handlers::get_company))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route_layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: ServerFuture,
    state: AppState,
    seed_report: Option<SeedReport>,
}

impl Application {
    /// Connects to MongoDB and builds the application on top of it.
    pub async fn build(config: CompanyConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, config.mongodb.database.as_deref())
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        Self::build_with_store(config, Arc::new(db)).await
    }

    /// Seeds `store` when the reset directive is set, then binds the listener.
    /// Requests are only accepted once seeding has finished.
    pub async fn build_with_store(
        config: CompanyConfig,
        store: Arc<dyn CompanyStore>,
    ) -> Result<Self, AppError> {
        let seed_report = if config.seed.reset_db {
            let dataset = seed_dataset()?;
            let report = seed_companies(store.as_ref(), &dataset).await?;
            if !report.is_complete() {
                tracing::warn!(
                    failed = report.failures.len(),
                    inserted = report.inserted(),
                    "Seeding finished with failed inserts"
                );
            }
            Some(report)
        } else {
            None
        };

        let state = AppState::new(store);
        let app = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Server running on http://localhost:{}", port);

        let server = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .into_future();

        Ok(Self {
            port,
            server: Box::pin(server),
            state,
            seed_report,
        })
    }

    pub fn store(&self) -> &Arc<dyn CompanyStore> {
        &self.state.store
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn seed_report(&self) -> Option<&SeedReport> {
        self.seed_report.as_ref()
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
