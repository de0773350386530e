//! @ai:module:intent Cancellation and timeout context forwarded into completion calls
//! @ai:module:layer infrastructure
//! @ai:module:public_api RunContext
//! @ai:module:stateless false

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// @ai:intent Caller-supplied cancellation token plus optional per-call timeout
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl RunContext {
    /// @ai:intent Context that never cancels and never times out
    /// @ai:effects pure
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Builder: bound every call by a timeout
    /// @ai:effects pure
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// @ai:intent Builder: share an externally owned cancellation token
    /// @ai:effects pure
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// @ai:intent Drive a call to completion unless cancelled or timed out first
    /// @ai:post cancellation and timeout surface as Error::Execution for this call only
    /// @ai:effects time
    pub async fn run<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(Error::Execution("request cancelled".to_string()));
        }

        let guarded = async {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(Error::Execution("request cancelled".to_string())),
                result = call => result,
            }
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, guarded).await.unwrap_or_else(|_| {
                Err(Error::Execution(format!(
                    "request timed out after {} ms",
                    limit.as_millis()
                )))
            }),
            None => guarded.await,
        }
    }
}
