use std::time::Duration;

/// How long a bounded consume is willing to wait for tokens.
///
/// Absolute deadlines are expressed on the bucket's own [`Clock`](crate::Clock)
/// (see [`TokenBucket::clock`](crate::TokenBucket::clock)). A relative
/// deadline is anchored when the consume call starts. A [`Duration`] converts
/// into a relative deadline. `At(f64::NAN)` gives up immediately and
/// `At(f64::INFINITY)` waits like [`Deadline::Never`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Deadline {
    /// Wait for as long as it takes.
    Never,
    /// Give up once the bucket's clock reads this many seconds.
    At(f64),
    /// Give up once this much time has passed since the call started.
    After(Duration),
}

impl Deadline {
    /// Absolute clock time at which to give up, `None` for no deadline.
    ///
    /// A NaN instant compares false against every clock reading, so it is
    /// treated as already passed.
    pub(crate) fn resolve(self, now: f64) -> Option<f64> {
        match self {
            Deadline::Never => None,
            Deadline::At(at) if at.is_nan() => Some(f64::NEG_INFINITY),
            Deadline::At(at) => Some(at),
            Deadline::After(timeout) => Some(now + timeout.as_secs_f64()),
        }
    }
}

impl From<Duration> for Deadline {
    fn from(timeout: Duration) -> Self {
        Deadline::After(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve() {
        assert_eq!(None, Deadline::Never.resolve(3.0));
        assert_eq!(Some(1.0), Deadline::At(1.0).resolve(3.0));
        assert_eq!(
            Some(3.5),
            Deadline::from(Duration::from_millis(500)).resolve(3.0)
        );
    }

    #[test]
    fn nan_instant_has_already_passed() {
        let at = Deadline::At(f64::NAN).resolve(3.0).unwrap();
        assert!(3.0 >= at);
        assert!(f64::MIN >= at);
    }
}
