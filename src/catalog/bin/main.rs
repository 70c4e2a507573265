use book_catalog::catalog::controller::build_router;
use book_catalog::catalog::factory::create_catalog_service;
use book_catalog::core::controller::AppState;
use book_catalog::core::domain::Configuration;
use book_catalog::utils::logs::setup_tracing;

#[tokio::main]
async fn main() {
    let config = match Configuration::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {}", err);
            std::process::exit(1);
        }
    };
    setup_tracing(config.log_level);
    tracing::info!(store = %config.store, seed = ?config.seed, database = ?config.database, "starting catalog");

    let catalog = match create_catalog_service(&config).await {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!(error = %err, "failed to build catalog service");
            std::process::exit(1);
        }
    };

    let addr = config.listen_addr;
    let app = build_router(AppState::new(catalog));
    let server = match axum::Server::try_bind(&addr) {
        Ok(builder) => builder,
        Err(err) => {
            tracing::error!(%addr, error = %err, "failed to bind listener");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "catalog listening");

    if let Err(err) = server
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await {
        tracing::error!(error = %err, "server failed");
        std::process::exit(1);
    }
    tracing::info!("catalog stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    #[cfg(not(unix))]
    ctrl_c.await;
}
