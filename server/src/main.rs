use std::net::SocketAddr;

use error_stack::ResultExt;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use kernel::KernelError;

use crate::config::ServerConfig;
use crate::error::StackTrace;
use crate::handler::AppModule;

mod config;
mod controller;
mod error;
mod handler;
mod route;

#[tokio::main]
async fn main() -> Result<(), StackTrace> {
    let config = ServerConfig::from_env()?;

    let appender = tracing_appender::rolling::daily(&config.log_dir, "debug.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_filter(tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(non_blocking_appender)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .init();

    let app = AppModule::new().await?;
    let router = route::router(app);

    let bind = SocketAddr::from(([0, 0, 0, 0], config.port));
    let tcp = TcpListener::bind(bind)
        .await
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("Failed to listen on {bind}"))?;
    tracing::info!("Listening on {bind}");

    axum::serve(tcp, router.into_make_service())
        .await
        .change_context_lazy(|| KernelError::Internal)?;

    Ok(())
}
