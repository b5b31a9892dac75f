use std::future::Future;

use thiserror::Error;
use tokio::time::{sleep, Duration, Instant};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollUntilError {
    #[error("Condition error: {0}")]
    ConditionError(String),

    #[error("Condition not satisfied")]
    ConditionNotSatisfied,

    #[error("Timeout reached")]
    Timeout,
}

/// Re-evaluates `condition` every `delay` until it yields a value or `timeout` elapses.
///
/// `ConditionNotSatisfied` means try again; any other error ends the poll and is returned as is.
pub async fn poll_until<F, Fut, R>(
    condition: F,
    timeout: Duration,
    delay: Duration,
) -> Result<R, PollUntilError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<R, PollUntilError>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        match condition().await {
            Err(PollUntilError::ConditionNotSatisfied) => {},
            other => return other,
        }
        if Instant::now() + delay > deadline {
            return Err(PollUntilError::Timeout);
        }
        sleep(delay).await;
    }
}
