//! Concurrent access harness.
//!
//! Runs independent stores against one base directory from several threads,
//! the way separate processes would share it.

use hearth_fs::Filesystem;
use hearth_store::{Store, StoreOptions};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Configuration for a concurrent run.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of threads, each with its own store.
    pub threads: usize,
    /// Operations per thread.
    pub operations: usize,
    /// Size of each record in bytes.
    pub record_size: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            operations: 50,
            record_size: 256,
        }
    }
}

/// Result of a concurrent run.
#[derive(Debug, Clone)]
pub struct StressResult {
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
}

/// Has every thread overwrite one shared record and read it back.
///
/// Each record written is a run of one byte value unique to the writing
/// thread. A read that returns mixed bytes means a reader observed a
/// partial write and is counted as a failure.
pub fn run_contended_writes(options: &StoreOptions, config: &StressConfig) -> StressResult {
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let options = options.clone();
            let config = config.clone();
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);

            thread::spawn(move || {
                let mut store = Store::new(options, Filesystem::default());
                let fill = (t % 251) as u8;
                let data = vec![fill; config.record_size];

                for _ in 0..config.operations {
                    let ok = store.write("contended", &data).is_ok()
                        && store
                            .read("contended")
                            .map(|read| is_uniform(&read, config.record_size))
                            .unwrap_or(false);
                    if ok {
                        successful.fetch_add(1, Ordering::Relaxed);
                    } else {
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressResult {
        successful_ops: successful.load(Ordering::Relaxed),
        failed_ops: failed.load(Ordering::Relaxed),
        duration: start.elapsed(),
    }
}

fn is_uniform(data: &[u8], expected_len: usize) -> bool {
    data.len() == expected_len && data.windows(2).all(|w| w[0] == w[1])
}
