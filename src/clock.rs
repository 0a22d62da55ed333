use std::fmt::{Debug, Display};
use std::num::NonZeroU64;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// A strictly positive span of time with nanosecond resolution.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nanos(NonZeroU64);

impl Nanos {
    /// Returns `None` for durations that round down to zero nanoseconds.
    ///
    /// Durations longer than `u64::MAX` nanoseconds (~584 years) saturate.
    pub fn new_checked(duration: Duration) -> Option<Self> {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        NonZeroU64::new(nanos).map(Self)
    }

    pub(crate) const fn from_secs(secs: u64) -> Option<Self> {
        match NonZeroU64::new(secs.saturating_mul(1_000_000_000)) {
            Some(nanos) => Some(Self(nanos)),
            None => None,
        }
    }

    pub const fn as_nanos(&self) -> u64 {
        self.0.get()
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0.get() as f64 / 1e9
    }
}

impl From<Nanos> for Duration {
    fn from(nanos: Nanos) -> Duration {
        Duration::from_nanos(nanos.as_nanos())
    }
}

impl Debug for Nanos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&Duration::from(*self), f)
    }
}

impl Display for Nanos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&Duration::from(*self), f)
    }
}

/// Source of monotonic time for a [`TokenBucket`](crate::TokenBucket).
///
/// The bucket only ever looks at differences between two readings, so the
/// origin is arbitrary. Readings must never go backwards.
pub trait Clock {
    /// Current time in seconds since the clock's origin.
    fn now(&self) -> f64;
}

/// Clock backed by [`std::time::Instant`]. This is the default.
///
/// Blocking waits park the thread on a condition variable that also measures
/// time with `Instant`, so this clock keeps the bucket's view of time and the
/// waiters' view of time consistent.
#[derive(Clone)]
pub struct StdClock {
    origin: std::time::Instant,
}

impl Default for StdClock {
    fn default() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Clock for StdClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock backed by the `quanta` crate (TSC based where available). Requires
/// the "quanta" feature.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "quanta")]
/// # {
/// use std::time::Duration;
///
/// use ration::{Limit, QuantaClock, TokenBucket};
///
/// let limit = Limit::new(10, 1, Duration::from_millis(100)).unwrap();
/// let bucket = TokenBucket::from_parts(limit, 10, QuantaClock::default());
/// assert_eq!(10, bucket.available());
/// # }
/// ```
#[cfg(feature = "quanta")]
#[derive(Clone)]
pub struct QuantaClock {
    origin: quanta::Instant,
}

#[cfg(feature = "quanta")]
impl Default for QuantaClock {
    fn default() -> Self {
        Self::new(quanta::Clock::new())
    }
}

#[cfg(feature = "quanta")]
impl QuantaClock {
    /// Anchors the clock's origin at the current reading of `clock`.
    pub fn new(clock: quanta::Clock) -> Self {
        let origin = clock.now();
        Self { origin }
    }
}

#[cfg(feature = "quanta")]
impl Clock for QuantaClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock backed by [`tokio::time::Instant`]. Requires the "tokio" feature.
///
/// Follows tokio's paused/auto-advanced time in tests, which makes it the
/// natural companion of the async adapters.
#[cfg(feature = "tokio")]
#[derive(Clone)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

#[cfg(feature = "tokio")]
impl Default for TokioClock {
    fn default() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

#[cfg(feature = "tokio")]
impl Clock for TokioClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for tests and simulations.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use ration::{Limit, ManualClock, TokenBucket};
///
/// let clock = Arc::new(ManualClock::new(0.0));
/// let limit = Limit::new(10, 2, Duration::from_secs(1)).unwrap();
/// let bucket = TokenBucket::from_parts(limit, 0, Arc::clone(&clock));
/// assert_eq!(0, bucket.available());
///
/// // credit is only granted once a full interval has passed
/// clock.advance(1.5);
/// assert_eq!(2, bucket.available());
/// ```
pub struct ManualClock {
    now: Mutex<f64>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ManualClock {
    /// Creates a clock that reads `now` seconds until it is moved.
    pub fn new(now: f64) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Jumps to an absolute time in seconds.
    pub fn set(&self, now: f64) {
        *self.now.lock() = now;
    }

    /// Moves the clock forward by `delta` seconds.
    pub fn advance(&self, delta: f64) {
        *self.now.lock() += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock()
    }
}

impl Clock for &ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock()
    }
}

impl Clock for Arc<ManualClock> {
    fn now(&self) -> f64 {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nanos_rejects_zero() {
        assert!(Nanos::new_checked(Duration::ZERO).is_none());
        let nanos = Nanos::new_checked(Duration::from_millis(250)).unwrap();
        assert_eq!(250_000_000, nanos.as_nanos());
        assert_eq!(0.25, nanos.as_secs_f64());
        assert_eq!(Duration::from_millis(250), Duration::from(nanos));
        assert_eq!("250ms", nanos.to_string());
    }

    #[test]
    fn manual_clock() {
        let clock = ManualClock::default();
        assert_eq!(0.0, clock.now());
        clock.advance(1.5);
        assert_eq!(1.5, clock.now());
        clock.set(10.0);
        assert_eq!(10.0, (&clock).now());
    }

    #[test]
    fn std_clock_is_monotonic() {
        let clock = StdClock::default();
        let t1 = clock.now();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = clock.now();
        assert!(t2 - t1 >= 0.01);
    }
}
