use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, stream};
use ration::futures::RateLimitedStreamExt;
use ration::{Limit, TokenBucket, TokioClock};
use tokio::task::JoinSet;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    // all streams share 5 items every 200ms
    let limit = Limit::new(5, 5, Duration::from_millis(200)).unwrap();
    let bucket = Arc::new(TokenBucket::from_parts(limit, 5, TokioClock::default()));

    let start = tokio::time::Instant::now();
    let mut handles = JoinSet::new();
    for i in 1..=10 {
        handles.spawn({
            let bucket = Arc::clone(&bucket);
            async move {
                let mut items = std::pin::pin!(stream::iter(1..=10).rate_limit(bucket));
                while let Some(item) = items.next().await {
                    println!("[stream={i}] item: {}, elapsed={:?}", item, start.elapsed());
                }
            }
        });
    }

    handles.join_all().await;
    println!("Completed in {:?}", start.elapsed());
}
