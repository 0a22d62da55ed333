use std::fmt::{Debug, Formatter};
use std::time::Duration;

use likely_stable::unlikely;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::error::ExceededCapacity;
use crate::{Clock, Deadline, Limit, StdClock};

/// Longest a waiter sleeps before re-checking the bucket on its own.
pub(crate) const POLL_PERIOD: Duration = Duration::from_millis(200);
/// Shortest nap, so a waiter sitting right on an interval boundary does not spin.
pub(crate) const MIN_NAP: Duration = Duration::from_millis(1);

struct State {
    tokens: u32,
    // clock reading of the last credit
    last_replenished: f64,
}

/// A thread-safe token bucket that is credited in whole intervals.
///
/// Every time a full [`Limit::interval`] passes, [`Limit::tokens_per_interval`]
/// tokens are added, never exceeding [`Limit::capacity`]. There is no
/// background timer: elapsed time is reconciled lazily by whichever caller
/// touches the bucket next.
///
/// All state lives behind a single mutex. Waiters park on a condition variable
/// that is signalled whenever tokens are credited, and also wake up on their
/// own at least every 200ms (or at the next interval boundary, whichever comes
/// first) to replenish the bucket themselves. No ordering is guaranteed among
/// concurrent waiters.
///
/// # Type Parameters
///
/// - `C`: Clock implementation (default: [`StdClock`])
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use ration::{Limit, TokenBucket};
///
/// // one token every 100ms, at most 5 in the bucket, starting full
/// let limit = Limit::new(5, 1, Duration::from_millis(100)).unwrap();
/// let bucket = TokenBucket::with_initial_tokens(limit, 5);
///
/// assert!(bucket.try_consume(5, Duration::ZERO).unwrap());
/// assert_eq!(0, bucket.available());
///
/// // waits for the next interval to elapse
/// bucket.consume_blocking(1).unwrap();
///
/// // asking for more than the capacity is a usage error
/// assert!(bucket.consume_blocking(6).is_err());
/// ```
pub struct TokenBucket<C = StdClock> {
    state: Mutex<State>,
    replenished: Condvar,
    clock: C,
    limit: Limit,
}

impl TokenBucket<StdClock> {
    /// Creates an empty bucket driven by the standard clock.
    pub fn new(limit: Limit) -> Self {
        Self::from_parts(limit, 0, StdClock::default())
    }

    /// Creates a bucket holding `initial_tokens` (clamped to the capacity),
    /// driven by the standard clock.
    pub fn with_initial_tokens(limit: Limit, initial_tokens: u32) -> Self {
        Self::from_parts(limit, initial_tokens, StdClock::default())
    }
}

impl<C: Clock> TokenBucket<C> {
    /// Creates an empty bucket driven by a custom clock.
    pub fn with_clock(limit: Limit, clock: C) -> Self {
        Self::from_parts(limit, 0, clock)
    }

    /// Creates a bucket from all of its parts.
    ///
    /// `initial_tokens` is clamped to the capacity. The first interval starts
    /// at the clock's current reading.
    pub fn from_parts(limit: Limit, initial_tokens: u32, clock: C) -> Self {
        let state = State {
            tokens: initial_tokens.min(limit.capacity),
            last_replenished: clock.now(),
        };
        Self {
            state: Mutex::new(state),
            replenished: Condvar::new(),
            clock,
            limit,
        }
    }

    /// Returns the number of tokens in the bucket right now.
    ///
    /// Credits any whole intervals that elapsed since the last replenishment
    /// first. The value may be stale as soon as it is returned if other
    /// callers are consuming concurrently.
    pub fn available(&self) -> u32 {
        let mut state = self.state.lock();
        self.replenish(&mut state, self.clock.now());
        state.tokens
    }

    /// Takes `count` tokens, blocking the current thread for as long as it
    /// takes for them to become available.
    ///
    /// # Errors
    ///
    /// [`ExceededCapacity`] if `count` is larger than the capacity, in which
    /// case no amount of waiting could ever satisfy the request.
    pub fn consume_blocking(&self, count: u32) -> Result<(), ExceededCapacity> {
        let acquired = self.try_consume(count, Deadline::Never)?;
        debug_assert!(acquired);
        Ok(())
    }

    /// Takes `count` tokens, waiting until `deadline` at the latest.
    ///
    /// Returns `Ok(true)` once the tokens were deducted, or `Ok(false)` if the
    /// deadline passed first, in which case the bucket is left untouched.
    /// Running out of time is an expected outcome and not an error.
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
    /// use ration::{Deadline, Limit, TokenBucket};
    ///
    /// let limit = Limit::new(10, 1, Duration::from_secs(60)).unwrap();
    /// let bucket = TokenBucket::new(limit);
    ///
    /// // relative deadline
    /// assert!(!bucket.try_consume(1, Duration::from_millis(10)).unwrap());
    /// // absolute deadline on the bucket's clock, already in the past
    /// assert!(!bucket.try_consume(1, Deadline::At(0.0)).unwrap());
    /// ```
    pub fn try_consume(
        &self,
        count: u32,
        deadline: impl Into<Deadline>,
    ) -> Result<bool, ExceededCapacity> {
        self.check_request(count)?;
        let deadline = deadline.into().resolve(self.clock.now());
        let mut state = self.state.lock();
        loop {
            let now = self.clock.now();
            self.replenish(&mut state, now);
            if Self::take(&mut state, count) {
                return Ok(true);
            }
            let mut nap = self.remaining_in_interval(&state, now).min(POLL_PERIOD);
            if let Some(deadline) = deadline {
                if now >= deadline {
                    debug!(
                        requested = count,
                        available = state.tokens,
                        "deadline passed before enough tokens were available"
                    );
                    return Ok(false);
                }
                if let Ok(left) = Duration::try_from_secs_f64(deadline - now) {
                    nap = nap.min(left);
                }
            }
            self.replenished.wait_for(&mut state, nap.max(MIN_NAP));
        }
    }

    /// Takes `count` tokens if they are available right now, without waiting.
    ///
    /// # Errors
    ///
    /// [`ExceededCapacity`] if `count` is larger than the capacity.
    pub fn consume_now(&self, count: u32) -> Result<bool, ExceededCapacity> {
        self.check_request(count)?;
        let mut state = self.state.lock();
        self.replenish(&mut state, self.clock.now());
        Ok(Self::take(&mut state, count))
    }

    /// Time left until the current interval is over.
    ///
    /// Tokens are credited by the first observation made after that point.
    /// Returns [`Duration::ZERO`] if the interval is already over.
    pub fn time_until_replenish(&self) -> Duration {
        let mut state = self.state.lock();
        let now = self.clock.now();
        self.replenish(&mut state, now);
        self.remaining_in_interval(&state, now)
    }

    /// Maximum number of tokens the bucket can hold.
    pub fn capacity(&self) -> u32 {
        self.limit.capacity
    }

    /// Tokens credited per elapsed interval.
    pub fn tokens_per_interval(&self) -> u32 {
        self.limit.tokens_per_interval
    }

    /// The replenishing interval.
    pub fn replenishing_interval(&self) -> Duration {
        self.limit.interval()
    }

    /// The bucket's configuration.
    pub fn limit(&self) -> &Limit {
        &self.limit
    }

    /// The clock driving the bucket. Absolute [`Deadline`]s are read on it.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn check_request(&self, count: u32) -> Result<(), ExceededCapacity> {
        if unlikely(count > self.limit.capacity) {
            return Err(ExceededCapacity {
                requested: count,
                capacity: self.limit.capacity,
            });
        }
        Ok(())
    }

    fn take(state: &mut State, count: u32) -> bool {
        if state.tokens < count {
            return false;
        }
        state.tokens -= count;
        true
    }

    /// Credits every whole interval elapsed since the last credit. Partial
    /// intervals are dropped.
    fn replenish(&self, state: &mut State, now: f64) {
        let elapsed = now - state.last_replenished;
        let interval = self.limit.interval.as_secs_f64();
        if elapsed <= interval {
            return;
        }
        // saturating float-to-int cast
        let intervals = (elapsed / interval).floor() as u64;
        let credit = intervals.saturating_mul(u64::from(self.limit.tokens_per_interval));
        let tokens = u64::from(state.tokens)
            .saturating_add(credit)
            .min(u64::from(self.limit.capacity)) as u32;
        state.last_replenished = now;
        if tokens > state.tokens {
            trace!(
                intervals,
                credited = tokens - state.tokens,
                tokens,
                "replenished token bucket"
            );
            state.tokens = tokens;
            self.replenished.notify_all();
        }
    }

    fn remaining_in_interval(&self, state: &State, now: f64) -> Duration {
        let due = state.last_replenished + self.limit.interval.as_secs_f64();
        Duration::try_from_secs_f64(due - now).unwrap_or(Duration::ZERO)
    }
}

impl<C: Clock> Debug for TokenBucket<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBucket")
            .field("limit", &self.limit)
            .field("tokens", &self.state.lock().tokens)
            .finish_non_exhaustive()
    }
}
