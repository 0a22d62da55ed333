use std::sync::Arc;
use std::time::Duration;

use futures::stream;
use ration::futures::{RateLimitedStreamExt, WeightedStream};
use ration::{Limit, TokenBucket, TokioClock};
use tokio_stream::StreamExt;

#[derive(Debug, Clone)]
struct Upload {
    name: String,
    megabytes: u32,
}

impl Upload {
    fn new(name: &str, megabytes: u32) -> Self {
        Self {
            name: name.to_string(),
            megabytes,
        }
    }
}

#[tokio::main]
async fn main() {
    let uploads = vec![
        Upload::new("avatar.png", 1),
        Upload::new("report.pdf", 5),
        Upload::new("backup.tar", 10),
        Upload::new("notes.txt", 1),
        Upload::new("video.mp4", 20),
    ];

    // 5 MB every second, bursts of up to 20 MB
    let limit = Limit::new(20, 5, Duration::from_secs(1)).unwrap();
    let bucket = Arc::new(TokenBucket::from_parts(limit, 20, TokioClock::default()));

    let weighted_stream = WeightedStream::new(stream::iter(uploads), bucket, |upload: &Upload| {
        upload.megabytes
    });

    println!("uploading at 5 MB/s, burst of 20 MB");
    let start = std::time::Instant::now();
    let mut weighted_stream = std::pin::pin!(weighted_stream);
    while let Some(upload) = weighted_stream.next().await {
        println!(
            "[{:>6.2}s] uploaded '{}' ({} MB)",
            start.elapsed().as_secs_f64(),
            upload.name,
            upload.megabytes
        );
    }
    println!("total time: {:.2}s", start.elapsed().as_secs_f64());

    // same thing through the extension trait, charging one token per byte
    let limit = Limit::new(32, 8, Duration::from_millis(500)).unwrap();
    let bucket = Arc::new(TokenBucket::with_clock(limit, TokioClock::default()));
    let lines = stream::iter(vec!["short", "medium_length", "very_long_string_here", "x"]);
    let mut lines = std::pin::pin!(lines.rate_limit_weighted(bucket, |line: &&str| line.len() as u32));

    let start = std::time::Instant::now();
    while let Some(line) = lines.next().await {
        println!(
            "[{:>6.2}s] sent '{}' ({} bytes)",
            start.elapsed().as_secs_f64(),
            line,
            line.len()
        );
    }
}
