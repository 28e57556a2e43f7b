//! Listener setup, serving and shutdown signals.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tonic::transport::server::Router;
use user_directory::UserDirectoryModule;
use user_directory_sdk::SERVICE_NAME;

/// Where the gRPC server accepts connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenAddr {
    Tcp(SocketAddr),
    Uds(PathBuf),
}

impl FromStr for ListenAddr {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(path) = s.strip_prefix("uds://") {
            if !cfg!(unix) {
                anyhow::bail!("UDS listen_addr is not supported on this platform: '{s}'");
            }
            if path.is_empty() {
                anyhow::bail!("UDS listen_addr has an empty path: '{s}'");
            }
            return Ok(Self::Uds(PathBuf::from(path)));
        }
        s.parse::<SocketAddr>()
            .map(Self::Tcp)
            .with_context(|| format!("expected 'ip:port' or 'uds:///path', got '{s}'"))
    }
}

fn router(module: &UserDirectoryModule) -> Router {
    Server::builder().add_service(module.grpc_service())
}

/// Serves the user directory until `cancel` fires.
///
/// # Errors
/// Returns an error if binding fails or the server stops abnormally.
pub async fn serve(
    module: &UserDirectoryModule,
    addr: &ListenAddr,
    cancel: CancellationToken,
) -> Result<()> {
    match addr {
        ListenAddr::Tcp(sock) => {
            let listener = TcpListener::bind(sock)
                .await
                .with_context(|| format!("failed to bind TCP listener at '{sock}'"))?;
            let bound_addr = listener.local_addr()?;
            tracing::info!(%bound_addr, transport = "tcp", service = SERVICE_NAME, "gRPC server listening");

            router(module)
                .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                    cancel.cancelled().await;
                })
                .await
                .context("gRPC server failed")?;
        }
        ListenAddr::Uds(path) => serve_uds(module, path, cancel).await?,
    }
    tracing::info!("gRPC server stopped");
    Ok(())
}

#[cfg(unix)]
async fn serve_uds(
    module: &UserDirectoryModule,
    path: &std::path::Path,
    cancel: CancellationToken,
) -> Result<()> {
    use tokio::net::UnixListener;
    use tokio_stream::wrappers::UnixListenerStream;

    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("failed to remove stale socket '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "removed existing UDS socket file before bind");
    }

    let uds = UnixListener::bind(path)
        .with_context(|| format!("failed to bind UDS listener at '{}'", path.display()))?;
    tracing::info!(path = %path.display(), transport = "uds", service = SERVICE_NAME, "gRPC server listening");

    router(module)
        .serve_with_incoming_shutdown(UnixListenerStream::new(uds), async move {
            cancel.cancelled().await;
        })
        .await
        .context("gRPC server failed")
}

#[cfg(not(unix))]
async fn serve_uds(
    _module: &UserDirectoryModule,
    path: &std::path::Path,
    _cancel: CancellationToken,
) -> Result<()> {
    anyhow::bail!("UDS is not supported on this platform: '{}'", path.display())
}

/// Cancels `cancel` on Ctrl+C or SIGTERM.
pub fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match wait_for_shutdown().await {
            Ok(()) => tracing::info!("shutdown signal received, stopping"),
            Err(e) => tracing::error!(error = %e, "failed to listen for shutdown signals"),
        }
        cancel.cancel();
    });
}

async fn wait_for_shutdown() -> std::io::Result<()> {
    tokio::select! {
        res = signal::ctrl_c() => res,
        res = wait_sigterm() => res,
    }
}

#[cfg(unix)]
async fn wait_sigterm() -> std::io::Result<()> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    sigterm.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn wait_sigterm() -> std::io::Result<()> {
    std::future::pending().await
}
