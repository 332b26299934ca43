//! Server initialization and runtime setup.
//!
//! Wires storage, id generation and the service together, then runs the
//! HTTP and gRPC servers side by side until a shutdown signal arrives.

use crate::application::services::{UrlOperations, UrlService};
use crate::config::Config;
use crate::infrastructure::generator::RandomIdGenerator;
use crate::infrastructure::persistence::{InMemoryUrlStore, SqliteUrlStore};
use crate::routes::app_router;
use crate::rpc::UrlShortenerRpc;
use crate::rpc::proto::url_shortener_server::UrlShortenerServer;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Runs the HTTP and gRPC servers with the given configuration.
///
/// Initializes:
/// - SQLite connection pool and migrations, or the in-memory store
/// - Random id generator
/// - Axum HTTP server
/// - Tonic gRPC server with the standard health service
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Either server fails to bind
/// - Either server fails at runtime
/// - Graceful shutdown exceeds `SHUTDOWN_TIMEOUT_SECONDS`
pub async fn run(config: Config) -> Result<()> {
    let service = build_service(&config).await?;
    serve(&config, service).await
}

/// Builds the URL service over the configured storage backend.
pub async fn build_service(config: &Config) -> Result<Arc<dyn UrlOperations>> {
    let generator = Arc::new(RandomIdGenerator::new(config.short_id_bytes));

    if config.is_memory_backend() {
        info!("Using in-memory storage");
        let store = Arc::new(InMemoryUrlStore::new());
        return Ok(Arc::new(UrlService::new(
            config.domain.clone(),
            generator,
            store,
        )));
    }

    let store = SqliteUrlStore::connect(config)
        .await
        .context("Failed to open database")?;
    info!("Connected to database");

    Ok(Arc::new(UrlService::new(
        config.domain.clone(),
        generator,
        Arc::new(store),
    )))
}

/// Serves `service` over HTTP and gRPC until a shutdown signal arrives.
pub async fn serve(config: &Config, service: Arc<dyn UrlOperations>) -> Result<()> {
    let shutdown = CancellationToken::new();

    let http_addr: SocketAddr = config.listen_addr.parse()?;
    let grpc_addr: SocketAddr = config.grpc_listen_addr.parse()?;

    let app = app_router(AppState::new(service.clone(), config.request_timeout()));
    let listener = tokio::net::TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {http_addr}"))?;
    info!("Listening on http://{http_addr}");

    let http = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown.clone().cancelled_owned());

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<UrlShortenerServer<UrlShortenerRpc>>()
        .await;

    let rpc = UrlShortenerRpc::new(service, config.request_timeout());
    let grpc = tonic::transport::Server::builder()
        .add_service(health_service)
        .add_service(UrlShortenerServer::new(rpc))
        .serve_with_shutdown(grpc_addr, shutdown.clone().cancelled_owned());
    info!("Listening on grpc://{grpc_addr}");

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            match shutdown_signal().await {
                Ok(signal) => {
                    info!(signal, "Shutting down");
                    health_reporter
                        .set_not_serving::<UrlShortenerServer<UrlShortenerRpc>>()
                        .await;
                    shutdown.cancel();
                }
                Err(e) => error!(error = %e, "Could not listen for shutdown signals"),
            }
        }
    });

    let servers = async {
        tokio::try_join!(
            async { http.await.context("HTTP server failed") },
            async { grpc.await.context("gRPC server failed") },
        )
    };
    tokio::pin!(servers);

    tokio::select! {
        result = &mut servers => {
            result?;
            return Ok(());
        }
        _ = shutdown.cancelled() => {}
    }

    match tokio::time::timeout(config.shutdown_timeout(), servers).await {
        Ok(result) => {
            result?;
            info!("Shutdown complete");
            Ok(())
        }
        Err(_) => anyhow::bail!(
            "Graceful shutdown did not finish within {}s",
            config.shutdown_timeout_seconds
        ),
    }
}

/// Resolves with the name of the first termination signal received.
#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;
    let mut hangup = signal(SignalKind::hangup())?;

    let name = tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
        _ = quit.recv() => "SIGQUIT",
        _ = hangup.recv() => "SIGHUP",
    };

    Ok(name)
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
