use std::time::{Duration, Instant};

use ration::{Limit, TokenBucket};

fn main() {
    // one token every 250ms, up to 4 in the bucket
    let limit = Limit::new(4, 1, Duration::from_millis(250)).unwrap();
    let tb = TokenBucket::with_initial_tokens(limit, 4);
    let start = Instant::now();
    for i in 0..8 {
        tb.consume_blocking(1).unwrap();
        println!("op {i} at {:?}, {} left", start.elapsed(), tb.available());
    }
}
