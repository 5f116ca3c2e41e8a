mod error;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use dbctl_core::agent::AgentTransport;
use dbctl_core::conf::EnvConfigSettings;
use dbctl_core::dispatch::CompletionDispatcher;
use dbctl_core::job_monitor::JobMonitor;

use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;

use state::AppState;
use tracing::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let env_config = EnvConfigSettings::init();
    env_config
        .ensure_directories()
        .expect("failed to create query-temp/results/notification directories");

    let diesel_config =
        AsyncDieselConnectionManager::<AsyncPgConnection>::new(env_config.database_url.clone());
    let pool: Pool<AsyncPgConnection> = Pool::builder()
        .build(diesel_config)
        .await
        .expect("pool failed to start");

    let transport = AgentTransport::new(&env_config).expect("failed to build agent transport");
    let dispatcher = Arc::new(CompletionDispatcher::new(pool.clone()));
    let job_monitor = Arc::new(JobMonitor::new(
        pool.clone(),
        transport.clone(),
        dispatcher,
        Duration::from_secs(env_config.job_poll_interval_secs),
    ));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let monitor_for_loop = job_monitor.clone();
    let monitor_handle = tokio::spawn(async move { monitor_for_loop.run(shutdown_rx).await });

    let port = env_config.port;
    let state = web::Data::new(AppState {
        pool,
        transport,
        job_monitor,
        conf: env_config,
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes::actors::configure)
            .configure(routes::databases::configure)
            .configure(routes::objects::configure)
            .configure(routes::pdbs::configure)
            .configure(routes::jobs::configure)
            .configure(routes::sync::configure)
    })
    .bind(("0.0.0.0", port))?
    .run();

    let server_handle = server.handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received, stopping http server");
        server_handle.stop(true).await;
    });

    server.await?;

    let _ = shutdown_tx.send(());
    if let Err(e) = monitor_handle.await {
        tracing::error!("job monitor task panicked: {e}");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
