#![doc = include_str!("../README.md")]
//!
//! # Core Components
//!
//! - [`TokenBucket`] - The blocking, interval-credited token bucket
//! - [`Limit`] - Capacity, tokens per interval and interval length
//! - [`Deadline`] - How long a bounded consume may wait
//! - [`Clock`] trait and implementations for time sources
//! - [`futures`] - Async acquisition and rate-limited streams (feature "async")
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::Duration;
//!
//! use ration::{Limit, TokenBucket};
//!
//! // 2 tokens every 50ms, at most 10 in the bucket, 4 to start with
//! let limit = Limit::new(10, 2, Duration::from_millis(50)).unwrap();
//! let bucket = TokenBucket::with_initial_tokens(limit, 4);
//!
//! // blocks until 3 tokens could be taken
//! bucket.consume_blocking(3).unwrap();
//!
//! // waits at most 10ms
//! if bucket.try_consume(5, Duration::from_millis(10)).unwrap() {
//!     println!("got 5 tokens");
//! }
//! ```

mod bucket;
mod clock;
mod deadline;
mod error;
#[cfg(feature = "async")]
pub mod futures;
mod limit;

pub use bucket::TokenBucket;
#[cfg(feature = "tokio")]
pub use clock::TokioClock;
pub use clock::{Clock, ManualClock, Nanos, StdClock};
#[cfg(feature = "quanta")]
pub use clock::QuantaClock;
pub use deadline::Deadline;
pub use error::*;
#[cfg(feature = "async")]
pub use futures::RateLimitedStreamExt;
pub use limit::Limit;
