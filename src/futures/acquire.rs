use std::time::Duration;

use tracing::debug;

use super::sleep;
use crate::bucket::{MIN_NAP, POLL_PERIOD};
use crate::error::ExceededCapacity;
use crate::{Clock, Deadline, TokenBucket};

impl<C: Clock> TokenBucket<C> {
    /// Async version of [`try_consume`](Self::try_consume).
    ///
    /// Sleeps on the runtime's timer until the next interval boundary (or at
    /// most 200ms) between attempts instead of parking the thread. Pass
    /// [`Deadline::Never`] to wait for as long as it takes.
    ///
    /// # Errors
    ///
    /// [`ExceededCapacity`] if `count` is larger than the capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    ///
    /// use ration::{Deadline, Limit, TokenBucket, TokioClock};
    ///
    /// # #[tokio::main(flavor = "current_thread", start_paused = true)]
    /// # async fn main() {
    /// let limit = Limit::new(1, 1, Duration::from_secs(1)).unwrap();
    /// let bucket = TokenBucket::with_clock(limit, TokioClock::default());
    ///
    /// assert!(!bucket.acquire(1, Duration::from_millis(100)).await.unwrap());
    /// assert!(bucket.acquire(1, Deadline::Never).await.unwrap());
    /// # }
    /// ```
    pub async fn acquire(
        &self,
        count: u32,
        deadline: impl Into<Deadline>,
    ) -> Result<bool, ExceededCapacity> {
        let deadline = deadline.into().resolve(self.clock().now());
        loop {
            if self.consume_now(count)? {
                return Ok(true);
            }
            let mut nap = self.time_until_replenish().min(POLL_PERIOD);
            if let Some(deadline) = deadline {
                let now = self.clock().now();
                if now >= deadline {
                    debug!(
                        requested = count,
                        "deadline passed before enough tokens were available"
                    );
                    return Ok(false);
                }
                if let Ok(left) = Duration::try_from_secs_f64(deadline - now) {
                    nap = nap.min(left);
                }
            }
            sleep(nap.max(MIN_NAP)).await;
        }
    }
}
