//! API server entry point.

use api::config::Config;
use api::error::AppError;
use api::state::Stores;
use document_store::PostgresDocumentStore;
use domain::Product;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn open_stores(config: &Config) -> Result<Stores, AppError> {
    let Some(url) = config.database_url.as_deref() else {
        tracing::info!("DATABASE_URL not set, keeping documents in memory");
        return Ok(Stores::in_memory());
    };

    let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
    PostgresDocumentStore::<Product>::new(pool.clone())
        .run_migrations()
        .await?;
    tracing::info!("connected to postgres and applied migrations");
    Ok(Stores::postgres(pool))
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    // 3. Open document stores and start background tasks
    let stores = open_stores(&config).await?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (state, background) = api::start(&config, stores, shutdown_rx);

    // 4. Build the application
    let app = api::create_app(state, metrics_handle);

    // 5. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await?;

    // 6. Drain background tasks
    match background.brand_worker.await {
        Ok(handled) => tracing::info!(handled, "brand worker stopped"),
        Err(err) => tracing::error!(error = %err, "brand worker panicked"),
    }
    for sink in background.sinks {
        if let Err(err) = sink.await {
            tracing::error!(error = %err, "event sink panicked");
        }
    }

    tracing::info!("server shut down gracefully");
    Ok(())
}
