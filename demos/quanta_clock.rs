use std::time::Duration;

use ration::{Limit, QuantaClock, TokenBucket};

fn main() {
    let limit = Limit::new(20, 10, Duration::from_secs(1)).unwrap();
    let tb = TokenBucket::with_clock(limit, QuantaClock::default());
    // after two seconds the bucket should be full
    println!("sleeping for 2 seconds...");
    std::thread::sleep(Duration::from_millis(2100));
    println!("available: {}", tb.available());
    assert!(tb.consume_now(5).unwrap());
    println!("consumed 5, available: {}", tb.available());
}
