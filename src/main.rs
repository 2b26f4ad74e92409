use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use libris::logging::{init_tracing, shutdown_tracer};
use libris::metrics::{init_metrics, metrics_app};
use libris::router::init_router;
use libris::state::init_app_state;
use libris_config::ServerConfig;
use libris_db::run_migrations;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing().context("failed to initialize tracing")?;

    let server_config = ServerConfig::from_env();

    let state = init_app_state()
        .await
        .context("failed to connect to the database")?;
    run_migrations(&state.db)
        .await
        .context("failed to run migrations")?;

    match init_metrics() {
        Ok(Some(handle)) => {
            let addr = SocketAddr::from(([0, 0, 0, 0], server_config.metrics_port));
            let listener = TcpListener::bind(addr).await?;
            info!(%addr, "Metrics available at /metrics");
            tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                    error!(error = %e, "Metrics server stopped");
                }
            });
        }
        Ok(None) => info!("Observability disabled, metrics not exported"),
        Err(e) => error!(error = %e, "Failed to install metrics recorder"),
    }

    let app = init_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], server_config.port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Server running");
    info!("Swagger UI available at http://localhost:{}/swagger-ui", server_config.port);
    info!("Scalar UI available at http://localhost:{}/scalar", server_config.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    shutdown_tracer();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
