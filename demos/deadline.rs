use std::sync::Arc;
use std::time::Duration;

use ration::{Limit, TokenBucket};

fn main() {
    // 5 tokens per second, no burst beyond that
    let limit = Limit::new(5, 5, Duration::from_secs(1)).unwrap();
    let tb = Arc::new(TokenBucket::new(limit));

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let tb = Arc::clone(&tb);
            std::thread::spawn(move || {
                // drop the work if no token shows up within 1.5s
                match tb.try_consume(1, Duration::from_millis(1500)) {
                    Ok(true) => println!("[worker={worker}] got a token"),
                    Ok(false) => println!("[worker={worker}] timed out"),
                    Err(err) => println!("[worker={worker}] {err}"),
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    // more than the capacity can never succeed
    if let Err(err) = tb.consume_blocking(6) {
        println!("rejected: {err}");
    }
}
