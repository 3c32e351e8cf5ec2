//! Bounded exponential retry around every RPC in the pipeline. Transient
//! server conditions are retried with growing delays; an authentication
//! failure triggers a single token refresh that does not consume an
//! attempt; everything else surfaces immediately.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tonic::Code;
use tracing::warn;

use crate::auth::AuthSession;
use crate::config::Config;
use crate::errors::{Error, Result};

fn is_transient(code: Code) -> bool {
    matches!(
        code,
        Code::Unavailable | Code::DeadlineExceeded | Code::Internal
    )
}

/// Retry policy: up to `limit + 1` attempts with sleeps of
/// `base_delay * 2^n` between them.
#[derive(Clone)]
pub struct Retrier {
    limit: u32,
    base_delay: Duration,
    auth: Option<Arc<AuthSession>>,
}

impl Retrier {
    pub fn new(limit: u32, base_delay: Duration, auth: Option<Arc<AuthSession>>) -> Self {
        Retrier {
            limit,
            base_delay,
            auth,
        }
    }

    pub fn from_config(config: &Config, auth: Option<Arc<AuthSession>>) -> Self {
        Self::new(
            config.retry_limit,
            Duration::from_millis(config.retry_delay_ms),
            auth,
        )
    }

    /// Runs `op` until it succeeds, fails non-transiently, or the attempt
    /// budget is exhausted. The closure must build a fresh request each
    /// call; streams are re-opened from scratch.
    pub async fn retry<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, tonic::Status>>,
    {
        let mut attempt = 0u32;
        let mut refreshed = false;
        loop {
            let status = match op().await {
                Ok(value) => return Ok(value),
                Err(status) => status,
            };

            if status.code() == Code::Unauthenticated && !refreshed {
                if let Some(auth) = &self.auth {
                    warn!(rpc = what, "authentication rejected, refreshing token");
                    auth.refresh().await?;
                    refreshed = true;
                    continue;
                }
            }

            if !is_transient(status.code()) {
                return Err(Error::Rpc(status));
            }

            if attempt >= self.limit {
                return Err(Error::RetryLimitExceeded {
                    code: status.code() as i32,
                    message: status.message().to_string(),
                });
            }

            let delay = self.base_delay * 2u32.pow(attempt);
            warn!(
                rpc = what,
                attempt = attempt + 1,
                total = self.limit + 1,
                code = ?status.code(),
                message = status.message(),
                "attempt failed, retrying in {:?}",
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;
    use tonic::Status;

    fn retrier(limit: u32, delay_ms: u64) -> Retrier {
        Retrier::new(limit, Duration::from_millis(delay_ms), None)
    }

    #[tokio::test(start_paused = true)]
    async fn unavailable_twice_then_ok() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();
        let result = retrier(2, 10)
            .retry("test", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(Status::unavailable("server down"))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await
            .unwrap();
        assert_eq!(result, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Backoff slept 10ms then 20ms.
        assert_eq!(start.elapsed(), Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_reports_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retrier(1, 10)
            .retry("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Status::unavailable("still down")) }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        match result {
            Err(Error::RetryLimitExceeded { code, message }) => {
                assert_eq!(code, Code::Unavailable as i32);
                assert_eq!(message, "still down");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn non_transient_codes_fail_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retrier(5, 10)
            .retry("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Status::not_found("no such blob")) }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(Error::Rpc(s)) if s.code() == Code::NotFound));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_limit_means_one_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retrier(0, 10)
            .retry("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Status::internal("broken")) }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(Error::RetryLimitExceeded { .. })));
    }

    #[tokio::test]
    async fn unauthenticated_refreshes_once_without_counting() {
        let mut token_file = tempfile::NamedTempFile::new().unwrap();
        token_file
            .write_all(br#"{"access_token": "tok"}"#)
            .unwrap();
        let auth = AuthSession::from_file(token_file.path()).unwrap();

        let calls = AtomicU32::new(0);
        let result = Retrier::new(0, Duration::from_millis(1), Some(auth))
            .retry("test", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(Status::unauthenticated("expired"))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await
            .unwrap();
        assert_eq!(result, "done");
        // With limit 0, the replay after the refresh was free.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unauthenticated_without_session_is_fatal() {
        let result: Result<()> = retrier(3, 1)
            .retry("test", || async { Err(Status::unauthenticated("expired")) })
            .await;
        assert!(matches!(result, Err(Error::Rpc(s)) if s.code() == Code::Unauthenticated));
    }
}
