//! Retries for idempotent unary calls.
//!
//! Only `UNAVAILABLE` and `DEADLINE_EXCEEDED` are retried. Every other status
//! is returned on the first failure. Callers must only route read-only or
//! otherwise idempotent calls through [`call_with_retry`].

use std::future::Future;
use std::time::Duration;

use tonic::{Code, Status};
use tracing::Instrument;

use crate::client::GrpcClientConfig;
use crate::{backoff_for, millis};

/// Per-call retry policy.
#[derive(Debug, Clone)]
#[must_use]
pub struct RpcRetryConfig {
    /// Attempts after the first one.
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RpcRetryConfig {
    fn default() -> Self {
        Self::from(&GrpcClientConfig::default())
    }
}

impl From<&GrpcClientConfig> for RpcRetryConfig {
    fn from(cfg: &GrpcClientConfig) -> Self {
        Self {
            max_retries: cfg.max_retries,
            base_backoff: cfg.base_backoff,
            max_backoff: cfg.max_backoff,
        }
    }
}

impl RpcRetryConfig {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.base_backoff = base;
        self.max_backoff = max;
        self
    }
}

fn is_transient(code: Code) -> bool {
    matches!(code, Code::Unavailable | Code::DeadlineExceeded)
}

/// Run `call` against `client`, retrying transient failures.
///
/// `req` is cloned for every attempt. `op` names the call in spans and logs,
/// e.g. `"userdir.get_user"`.
///
/// # Errors
/// Returns the first non-transient `Status`, or the last transient one once
/// the retry budget is spent.
pub async fn call_with_retry<TClient, F, Fut, Req, Res>(
    client: &mut TClient,
    cfg: &RpcRetryConfig,
    req: Req,
    call: F,
    op: &'static str,
) -> Result<Res, Status>
where
    F: Fn(&mut TClient, Req) -> Fut,
    Fut: Future<Output = Result<Res, Status>>,
    Req: Clone,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let span = tracing::debug_span!("grpc_call", op, attempt);
        let result = call(client, req.clone()).instrument(span).await;

        let status = match result {
            Ok(res) => {
                if attempt > 1 {
                    tracing::info!(op, attempt, "gRPC call succeeded after retries");
                }
                return Ok(res);
            }
            Err(status) => status,
        };

        if !is_transient(status.code()) || attempt > cfg.max_retries {
            tracing::warn!(op, attempt, code = ?status.code(), message = %status.message(), "gRPC call failed");
            return Err(status);
        }

        let backoff = backoff_for(attempt, cfg.base_backoff, cfg.max_backoff);
        tracing::debug!(op, attempt, backoff_ms = millis(backoff), "retrying gRPC call");
        tokio::time::sleep(backoff).await;
    }
}
