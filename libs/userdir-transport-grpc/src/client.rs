//! Channel construction for gRPC clients.
//!
//! Only transport concerns live here: connect/RPC timeouts, HTTP/2 keepalive
//! and retrying the initial connect. Per-call retries are in
//! [`crate::rpc_retry`].

use std::time::Duration;

use anyhow::Context;
use tonic::transport::{Channel, Endpoint};
use tracing::Instrument;

use crate::{backoff_for, millis};

/// Transport settings for a gRPC client.
///
/// The retry fields drive both [`connect_with_retry`] and, through
/// [`crate::rpc_retry::RpcRetryConfig`], per-call retries.
#[derive(Debug, Clone)]
pub struct GrpcClientConfig {
    /// Label used in spans and log events.
    pub service_name: &'static str,
    pub connect_timeout: Duration,
    /// Deadline applied by the channel to every call.
    pub rpc_timeout: Duration,
    /// Retries after the first attempt; `0` disables retrying.
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    /// Emit an `info` event once connected.
    pub log_connect: bool,
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            service_name: "grpc_client",
            connect_timeout: Duration::from_secs(5),
            rpc_timeout: Duration::from_secs(1),
            max_retries: 3,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(2),
            log_connect: true,
        }
    }
}

impl GrpcClientConfig {
    #[must_use]
    pub fn new(service_name: &'static str) -> Self {
        Self {
            service_name,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.base_backoff = base;
        self.max_backoff = max;
        self
    }

    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.log_connect = false;
        self
    }
}

fn build_endpoint(uri: String, cfg: &GrpcClientConfig) -> Result<Endpoint, tonic::transport::Error> {
    Ok(Endpoint::from_shared(uri)?
        .connect_timeout(cfg.connect_timeout)
        .timeout(cfg.rpc_timeout)
        .tcp_keepalive(Some(Duration::from_secs(30)))
        .http2_keep_alive_interval(Duration::from_secs(30))
        .keep_alive_timeout(Duration::from_secs(10))
        .keep_alive_while_idle(true))
}

/// Open a channel to `uri` and wrap it in a generated tonic client.
///
/// # Errors
/// Returns an error if `uri` is malformed or the connection cannot be made
/// within `connect_timeout`.
pub async fn connect_with_stack<TClient>(
    uri: impl Into<String>,
    cfg: &GrpcClientConfig,
) -> anyhow::Result<TClient>
where
    TClient: From<Channel>,
{
    let uri = uri.into();
    let span = tracing::debug_span!("grpc_connect", service = cfg.service_name, uri = %uri);

    async move {
        let channel = build_endpoint(uri, cfg)?.connect().await?;
        if cfg.log_connect {
            tracing::info!(
                service = cfg.service_name,
                connect_timeout_ms = millis(cfg.connect_timeout),
                rpc_timeout_ms = millis(cfg.rpc_timeout),
                "gRPC client connected"
            );
        }
        Ok::<_, anyhow::Error>(TClient::from(channel))
    }
    .instrument(span)
    .await
}

/// Like [`connect_with_stack`], retrying failed connects with linear backoff.
///
/// # Errors
/// Returns the last connect error once `max_retries` is exhausted.
pub async fn connect_with_retry<TClient>(
    uri: impl Into<String>,
    cfg: &GrpcClientConfig,
) -> anyhow::Result<TClient>
where
    TClient: From<Channel>,
{
    let uri = uri.into();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match connect_with_stack::<TClient>(uri.clone(), cfg).await {
            Ok(client) => return Ok(client),
            Err(e) if attempt <= cfg.max_retries => {
                let backoff = backoff_for(attempt, cfg.base_backoff, cfg.max_backoff);
                tracing::warn!(
                    service = cfg.service_name,
                    attempt,
                    error = %e,
                    backoff_ms = millis(backoff),
                    "gRPC connect failed, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to connect to {} after {attempt} attempts", cfg.service_name)
                });
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let cfg = GrpcClientConfig::new("users")
            .with_connect_timeout(Duration::from_secs(2))
            .with_rpc_timeout(Duration::from_millis(500))
            .with_max_retries(0)
            .quiet();

        assert_eq!(cfg.service_name, "users");
        assert_eq!(cfg.connect_timeout, Duration::from_secs(2));
        assert_eq!(cfg.rpc_timeout, Duration::from_millis(500));
        assert_eq!(cfg.max_retries, 0);
        assert!(!cfg.log_connect);
    }

    #[test]
    fn endpoint_rejects_empty_uri() {
        let cfg = GrpcClientConfig::default();
        assert!(build_endpoint(String::new(), &cfg).is_err());
        assert!(build_endpoint("http://127.0.0.1:33001".to_owned(), &cfg).is_ok());
    }
}
