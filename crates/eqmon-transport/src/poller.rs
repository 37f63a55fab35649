//! Self-scheduling poll loop for pull feeds.

use crate::error::{TransportError, TransportResult};
use crate::handler::{BoxFuture, FeedHandler, FeedPayload};
use crate::policy::PollPolicy;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One pollable endpoint.
pub trait PollSource: Send + Sync {
    /// Fetch the current payload body.
    fn fetch(&self) -> BoxFuture<'_, TransportResult<String>>;

    /// Label used in logs.
    fn name(&self) -> &str;
}

/// Poll loop with exactly one outstanding request.
///
/// The next request is scheduled only after the current one resolved and
/// the handler finished with it.
pub struct PollLoop {
    policy: PollPolicy,
    shutdown_token: CancellationToken,
}

impl PollLoop {
    pub fn new(policy: PollPolicy, shutdown_token: CancellationToken) -> Self {
        Self {
            policy,
            shutdown_token,
        }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Poll `source` until shutdown.
    ///
    /// Failures are logged and reported to the handler as `Unreachable`; they
    /// stop the loop only when a consecutive-failure ceiling is configured.
    pub async fn run<S, H>(&self, source: &S, handler: &mut H) -> TransportResult<()>
    where
        S: PollSource + ?Sized,
        H: FeedHandler,
    {
        let mut consecutive_failures = 0u32;
        info!(
            source = source.name(),
            interval_ms = self.policy.interval.as_millis() as u64,
            "Starting poll loop"
        );

        loop {
            if self.shutdown_token.is_cancelled() {
                info!("Shutdown requested, exiting poll loop");
                return Ok(());
            }

            match source.fetch().await {
                Ok(body) => {
                    if consecutive_failures > 0 {
                        info!(
                            source = source.name(),
                            after_failures = consecutive_failures,
                            "Poll recovered"
                        );
                    }
                    consecutive_failures = 0;
                    handler.on_payload(FeedPayload::Message(body)).await;
                }
                Err(e) => {
                    consecutive_failures += 1;
                    warn!(
                        source = source.name(),
                        error = %e,
                        consecutive_failures,
                        "Poll request failed"
                    );
                    handler
                        .on_payload(FeedPayload::Unreachable {
                            reason: e.to_string(),
                        })
                        .await;

                    if self.policy.is_exhausted(consecutive_failures) {
                        return Err(TransportError::RetriesExhausted {
                            attempts: consecutive_failures,
                        });
                    }
                }
            }

            let delay = self.policy.delay_after(consecutive_failures);
            debug!(delay_ms = delay.as_millis() as u64, "Next poll scheduled");

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = self.shutdown_token.cancelled() => {
                    info!("Shutdown requested during poll interval, exiting");
                    return Ok(());
                }
            }
        }
    }
}
