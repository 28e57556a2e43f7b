#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
//! Client-side gRPC plumbing shared by user directory consumers.
//!
//! - [`client`] builds a tonic [`Channel`](tonic::transport::Channel) with
//!   timeouts and keepalive, optionally retrying the initial connect.
//! - [`rpc_retry`] retries idempotent unary calls on transient failures.

pub mod client;
pub mod rpc_retry;

pub use client::{GrpcClientConfig, connect_with_retry, connect_with_stack};
pub use rpc_retry::{RpcRetryConfig, call_with_retry};

use std::time::Duration;

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Linear backoff for the given attempt, capped at `max`.
pub(crate) fn backoff_for(attempt: u32, base: Duration, max: Duration) -> Duration {
    base.saturating_mul(attempt).min(max)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_then_caps() {
        let base = Duration::from_millis(100);
        let max = Duration::from_millis(250);
        assert_eq!(backoff_for(1, base, max), Duration::from_millis(100));
        assert_eq!(backoff_for(2, base, max), Duration::from_millis(200));
        assert_eq!(backoff_for(3, base, max), max);
        assert_eq!(backoff_for(u32::MAX, base, max), max);
    }
}
