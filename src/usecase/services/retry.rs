use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::entities::sheet::CellValue;
use crate::usecase::ports::sink::{SheetSink, SinkError};

pub const DEFAULT_WRITE_ATTEMPTS: u32 = 5;
const MAX_BACKOFF_EXPONENT: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_WRITE_ATTEMPTS,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    // `attempt` is 0-based.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(attempt.min(MAX_BACKOFF_EXPONENT)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Delivered { attempts: u32 },
    Dropped { attempts: u32 },
}

/// Writes one row, retrying transient service errors with exponential backoff.
///
/// Once the attempts run out the row is dropped rather than failing the run.
/// Non-transient errors are returned immediately.
pub async fn write_row_with_retry(
    sink: &dyn SheetSink,
    row: u32,
    values: &[CellValue],
    policy: RetryPolicy,
) -> Result<WriteOutcome, SinkError> {
    let max_attempts = policy.max_attempts.max(1);
    for attempt in 0..max_attempts {
        match sink.write_row(row, values).await {
            Ok(()) => {
                return Ok(WriteOutcome::Delivered {
                    attempts: attempt + 1,
                })
            }
            Err(err) if err.is_transient() => {
                if attempt + 1 == max_attempts {
                    warn!(row, attempts = max_attempts, error = %err, "dropping row write after retries");
                    break;
                }
                let delay = policy.delay_after(attempt);
                debug!(row, attempt = attempt + 1, ?delay, error = %err, "row write failed, backing off");
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(WriteOutcome::Dropped {
        attempts: max_attempts,
    })
}
