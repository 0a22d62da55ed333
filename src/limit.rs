use std::num::NonZeroU32;
use std::time::Duration;

use crate::clock::Nanos;
use crate::error::InvalidInterval;

const SECOND: Nanos = match Nanos::from_secs(1) {
    Some(nanos) => nanos,
    None => unreachable!(),
};
const MINUTE: Nanos = match Nanos::from_secs(60) {
    Some(nanos) => nanos,
    None => unreachable!(),
};
const HOUR: Nanos = match Nanos::from_secs(3600) {
    Some(nanos) => nanos,
    None => unreachable!(),
};

/// Immutable configuration of a token bucket.
///
/// Every time a full `interval` elapses the bucket is credited with
/// `tokens_per_interval` tokens, up to `capacity`. Credit is only ever granted
/// in whole intervals.
///
/// # Examples
///
/// ```rust
/// use std::num::NonZeroU32;
/// use std::time::Duration;
///
/// use ration::Limit;
///
/// // 5 tokens every 200ms, never more than 20 at a time
/// let limit = Limit::new(20, 5, Duration::from_millis(200)).unwrap();
/// assert_eq!(25.0, limit.rate_per_second());
///
/// // 60 tokens per minute, burst of 10
/// let limit = Limit::per_minute(NonZeroU32::new(60).unwrap()).with_capacity(10);
/// assert_eq!(10, limit.capacity());
///
/// // a zero interval is rejected
/// assert!(Limit::new(1, 1, Duration::ZERO).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub(crate) capacity: u32,
    pub(crate) tokens_per_interval: u32,
    pub(crate) interval: Nanos,
}

impl std::fmt::Debug for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Limit(capacity={}, tokens_per_interval={}, interval={})",
            self.capacity, self.tokens_per_interval, self.interval
        )
    }
}

impl Limit {
    /// Creates a limit crediting `tokens_per_interval` tokens per `interval`
    /// into a bucket holding at most `capacity` tokens.
    ///
    /// A `tokens_per_interval` of zero is allowed and yields a drain-only
    /// bucket.
    ///
    /// # Errors
    ///
    /// [`InvalidInterval`] if `interval` is zero.
    pub fn new(
        capacity: u32,
        tokens_per_interval: u32,
        interval: Duration,
    ) -> Result<Self, InvalidInterval> {
        let interval = Nanos::new_checked(interval).ok_or(InvalidInterval)?;
        Ok(Self {
            capacity,
            tokens_per_interval,
            interval,
        })
    }

    /// `rate` tokens credited once per second. Capacity equals `rate`.
    pub const fn per_second(rate: NonZeroU32) -> Self {
        Self::per_period(rate, SECOND)
    }

    /// `rate` tokens credited once per minute. Capacity equals `rate`.
    pub const fn per_minute(rate: NonZeroU32) -> Self {
        Self::per_period(rate, MINUTE)
    }

    /// `rate` tokens credited once per hour. Capacity equals `rate`.
    pub const fn per_hour(rate: NonZeroU32) -> Self {
        Self::per_period(rate, HOUR)
    }

    const fn per_period(rate: NonZeroU32, interval: Nanos) -> Self {
        Self {
            capacity: rate.get(),
            tokens_per_interval: rate.get(),
            interval,
        }
    }

    /// Overrides the capacity (the burst allowance).
    pub const fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Maximum number of tokens the bucket can hold.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Tokens credited per elapsed interval.
    pub const fn tokens_per_interval(&self) -> u32 {
        self.tokens_per_interval
    }

    /// The replenishing interval.
    pub fn interval(&self) -> Duration {
        Duration::from(self.interval)
    }

    /// Long-run average rate in tokens per second.
    pub fn rate_per_second(&self) -> f64 {
        self.tokens_per_interval as f64 / self.interval.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use nonzero_ext::nonzero;

    use super::*;

    #[test]
    fn presets() {
        let limit = Limit::per_second(nonzero!(10u32));
        assert_eq!(10, limit.capacity());
        assert_eq!(10, limit.tokens_per_interval());
        assert_eq!(Duration::from_secs(1), limit.interval());
        assert_eq!(10.0, limit.rate_per_second());

        let limit = Limit::per_minute(nonzero!(30u32));
        assert_eq!(Duration::from_secs(60), limit.interval());
        assert_eq!(0.5, limit.rate_per_second());

        let limit = Limit::per_hour(nonzero!(3600u32)).with_capacity(5);
        assert_eq!(5, limit.capacity());
        assert_eq!(3600, limit.tokens_per_interval());
        assert_eq!(1.0, limit.rate_per_second());
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert_eq!(Err(InvalidInterval), Limit::new(10, 1, Duration::ZERO));
        assert!(Limit::new(10, 1, Duration::from_nanos(1)).is_ok());
    }

    #[test]
    fn drain_only_limit() {
        let limit = Limit::new(3, 0, Duration::from_secs(1)).unwrap();
        assert_eq!(0, limit.tokens_per_interval());
        assert_eq!(0.0, limit.rate_per_second());
    }

    #[test]
    fn debug_format() {
        let limit = Limit::new(10, 2, Duration::from_millis(500)).unwrap();
        assert_eq!(
            "Limit(capacity=10, tokens_per_interval=2, interval=500ms)",
            format!("{limit:?}")
        );
    }
}
