//! Async counterparts of the blocking consume operations. Requires the
//! "async" feature.
//!
//! Nothing in here parks a thread: waiting is done with timers that fire at
//! the next interval boundary, so these adapters are safe to use on an async
//! runtime. Pair them with [`TokioClock`](crate::TokioClock) to get
//! deterministic behaviour under tokio's paused test time.

mod acquire;
mod stream;

use std::sync::Arc;

#[cfg(feature = "tokio-hrtime")]
use tokio_hrtime::{Sleep, sleep};
#[cfg(not(feature = "tokio-hrtime"))]
use tokio::time::{Sleep, sleep};

pub use stream::{RateLimitedStream, WeightedStream};

use futures::Stream;

use crate::{Clock, TokenBucket};

/// Rate limits any [`Stream`] with a shared [`TokenBucket`].
pub trait RateLimitedStreamExt: Stream + Sized {
    /// Each item costs one token.
    fn rate_limit<C: Clock>(self, bucket: Arc<TokenBucket<C>>) -> RateLimitedStream<Self, C>;

    /// Each item costs `weight_fn(&item)` tokens.
    fn rate_limit_weighted<C, F>(
        self,
        bucket: Arc<TokenBucket<C>>,
        weight_fn: F,
    ) -> WeightedStream<Self, C, F>
    where
        C: Clock,
        F: Fn(&Self::Item) -> u32;
}

impl<S: Stream> RateLimitedStreamExt for S {
    fn rate_limit<C: Clock>(self, bucket: Arc<TokenBucket<C>>) -> RateLimitedStream<Self, C> {
        RateLimitedStream::new(self, bucket)
    }

    fn rate_limit_weighted<C, F>(
        self,
        bucket: Arc<TokenBucket<C>>,
        weight_fn: F,
    ) -> WeightedStream<Self, C, F>
    where
        C: Clock,
        F: Fn(&Self::Item) -> u32,
    {
        WeightedStream::new(self, bucket, weight_fn)
    }
}
