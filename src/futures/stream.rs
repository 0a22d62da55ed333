use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

use futures::Stream;
use likely_stable::unlikely;
use pin_project_lite::pin_project;
use tracing::warn;

use super::{Sleep, sleep};
use crate::bucket::{MIN_NAP, POLL_PERIOD};
use crate::{Clock, Limit, TokenBucket};

pin_project! {
    /// A stream wrapper that takes one token from a shared [`TokenBucket`]
    /// before yielding each item.
    ///
    /// Items are pulled from the inner stream eagerly and held back until the
    /// bucket can pay for them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use futures::stream;
    /// use ration::futures::RateLimitedStream;
    /// use ration::{Limit, TokenBucket, TokioClock};
    ///
    /// # async fn example() {
    /// let limit = Limit::new(10, 1, Duration::from_millis(100)).unwrap();
    /// let bucket = Arc::new(TokenBucket::with_clock(limit, TokioClock::default()));
    ///
    /// let rate_limited = RateLimitedStream::new(stream::iter(0..100), bucket);
    /// # }
    /// ```
    pub struct RateLimitedStream<S, C>
    where
        S: Stream,
        C: Clock,
    {
        #[pin]
        inner: WeightedStream<S, C, fn(&S::Item) -> u32>,
    }
}

fn one<T>(_: &T) -> u32 {
    1
}

impl<S, C> RateLimitedStream<S, C>
where
    S: Stream,
    C: Clock,
{
    /// Wraps `stream` so that every item costs one token of `bucket`.
    pub fn new(stream: S, bucket: Arc<TokenBucket<C>>) -> Self {
        Self {
            inner: WeightedStream::new(stream, bucket, one::<S::Item> as fn(&S::Item) -> u32),
        }
    }

    /// Returns the configuration of the underlying bucket.
    pub fn limit(&self) -> &Limit {
        self.inner.limit()
    }

    /// Returns the number of tokens currently in the bucket.
    pub fn available(&self) -> u32 {
        self.inner.available()
    }
}

impl<S, C> Stream for RateLimitedStream<S, C>
where
    S: Stream,
    C: Clock,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().inner.poll_next(cx)
    }
}

pin_project! {
    /// A stream that is rate limited by a token bucket with weighted consumption.
    /// Each item costs `weight_fn(&item)` tokens.
    ///
    /// A weight larger than the bucket's capacity could never be paid, such
    /// items are charged the full capacity instead.
    pub struct WeightedStream<S, C, F>
    where
        S: Stream,
        C: Clock,
        F: Fn(&S::Item) -> u32,
    {
        #[pin]
        stream: S,
        bucket: Arc<TokenBucket<C>>,
        weight_fn: F,
        #[pin]
        delay: Option<Sleep>,
        pending_item: Option<(S::Item, u32)>,
    }
}

impl<S, C, F> WeightedStream<S, C, F>
where
    S: Stream,
    C: Clock,
    F: Fn(&S::Item) -> u32,
{
    /// Creates a new weighted stream.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use futures::stream;
    /// use ration::futures::WeightedStream;
    /// use ration::{Limit, TokenBucket, TokioClock};
    ///
    /// let limit = Limit::new(64, 16, Duration::from_millis(100)).unwrap();
    /// let bucket = Arc::new(TokenBucket::with_clock(limit, TokioClock::default()));
    ///
    /// let stream = stream::iter(vec!["small", "large", "medium"]);
    /// let weighted_stream = WeightedStream::new(stream, bucket, |item: &&str| item.len() as u32);
    /// ```
    pub fn new(stream: S, bucket: Arc<TokenBucket<C>>, weight_fn: F) -> Self {
        Self {
            stream,
            bucket,
            weight_fn,
            delay: None,
            pending_item: None,
        }
    }

    /// Returns the configuration of the underlying bucket.
    pub fn limit(&self) -> &Limit {
        self.bucket.limit()
    }

    /// Returns the number of tokens currently in the bucket.
    pub fn available(&self) -> u32 {
        self.bucket.available()
    }
}

fn affordable_weight(weight: u32, capacity: u32) -> u32 {
    if unlikely(weight > capacity) {
        warn!(weight, capacity, "item weight exceeds bucket capacity, charging capacity");
        return capacity;
    }
    weight
}

impl<S, C, F> Stream for WeightedStream<S, C, F>
where
    S: Stream,
    C: Clock,
    F: Fn(&S::Item) -> u32,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            if let Some(delay) = this.delay.as_mut().as_pin_mut() {
                ready!(delay.poll(cx));
                this.delay.set(None);
            }

            let weight = match this.pending_item.as_ref() {
                Some((_, weight)) => *weight,
                None => match ready!(this.stream.as_mut().poll_next(cx)) {
                    Some(item) => {
                        let weight =
                            affordable_weight((this.weight_fn)(&item), this.bucket.capacity());
                        *this.pending_item = Some((item, weight));
                        weight
                    }
                    None => return Poll::Ready(None),
                },
            };

            if matches!(this.bucket.consume_now(weight), Ok(true)) {
                return Poll::Ready(this.pending_item.take().map(|(item, _)| item));
            }

            // poll the timer on the next turn so the waker gets registered
            let nap = this.bucket.time_until_replenish().min(POLL_PERIOD);
            this.delay.set(Some(sleep(nap.max(MIN_NAP))));
        }
    }
}
