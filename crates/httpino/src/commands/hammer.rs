//! `httpino hammer` - contention smoke test against one document
//!
//! Writers store self-checking documents (`payload` is `stamp` repeated
//! `len` times); readers verify every document they decode. Any torn or
//! unreadable document fails the run.

use crate::output::print_line;
use anyhow::{Result, bail};
use colored::Colorize;
use httpino_core::Store;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

#[derive(Debug, Serialize, Deserialize)]
struct Stamped {
    stamp: usize,
    len: usize,
    payload: Vec<usize>,
}

impl Stamped {
    fn new(stamp: usize) -> Self {
        let len = 1 + (stamp * 37) % 500;
        Self {
            stamp,
            len,
            payload: vec![stamp; len],
        }
    }

    fn is_intact(&self) -> bool {
        self.payload.len() == self.len && self.payload.iter().all(|&s| s == self.stamp)
    }
}

#[derive(Debug, Default)]
struct Tally {
    writes: AtomicUsize,
    write_errors: AtomicUsize,
    intact: AtomicUsize,
    torn: AtomicUsize,
    empty: AtomicUsize,
    read_errors: AtomicUsize,
}

impl Tally {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::Relaxed)
    }
}

pub fn run(store: Store, path: &Path, writers: usize, readers: usize, rounds: usize) -> Result<()> {
    if writers + readers == 0 {
        bail!("Nothing to do: --writers and --readers are both 0");
    }

    let store = Arc::new(store);
    if !path.exists() {
        store.write(path, &Stamped::new(0))?;
    }

    let path: Arc<PathBuf> = Arc::new(path.to_path_buf());
    let tally = Arc::new(Tally::default());
    let barrier = Arc::new(Barrier::new(writers + readers));
    let started = Instant::now();

    let mut handles = Vec::with_capacity(writers + readers);
    for writer in 0..writers {
        let (store, path, tally, barrier) = shared(&store, &path, &tally, &barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for round in 0..rounds {
                match store.write(&*path, &Stamped::new(writer * rounds + round)) {
                    Ok(()) => Tally::bump(&tally.writes),
                    Err(e) => {
                        tracing::error!(error = %e, "write failed");
                        Tally::bump(&tally.write_errors);
                    }
                }
            }
        }));
    }
    for _ in 0..readers {
        let (store, path, tally, barrier) = shared(&store, &path, &tally, &barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..rounds {
                match store.read::<Stamped>(&*path) {
                    Ok(Some(doc)) if doc.is_intact() => Tally::bump(&tally.intact),
                    Ok(Some(doc)) => {
                        tracing::error!(stamp = doc.stamp, "torn document");
                        Tally::bump(&tally.torn);
                    }
                    Ok(None) => Tally::bump(&tally.empty),
                    Err(e) => {
                        tracing::error!(error = %e, "read failed");
                        Tally::bump(&tally.read_errors);
                    }
                }
            }
        }));
    }

    for handle in handles {
        if handle.join().is_err() {
            bail!("A worker thread panicked");
        }
    }

    let elapsed = started.elapsed();
    print_line(&format!(
        "{} writes ({} failed), {} reads: {} intact, {} torn, {} empty, {} failed in {:.2?}",
        Tally::get(&tally.writes),
        Tally::get(&tally.write_errors),
        readers * rounds,
        Tally::get(&tally.intact),
        Tally::get(&tally.torn),
        Tally::get(&tally.empty),
        Tally::get(&tally.read_errors),
        elapsed,
    ))?;

    let failures = Tally::get(&tally.write_errors)
        + Tally::get(&tally.torn)
        + Tally::get(&tally.empty)
        + Tally::get(&tally.read_errors);
    if failures > 0 {
        print_line(&"FAILED".red().bold().to_string())?;
        bail!("{failures} operations failed");
    }

    print_line(&"OK".green().bold().to_string())?;
    Ok(())
}

#[allow(clippy::type_complexity)]
fn shared(
    store: &Arc<Store>,
    path: &Arc<PathBuf>,
    tally: &Arc<Tally>,
    barrier: &Arc<Barrier>,
) -> (Arc<Store>, Arc<PathBuf>, Arc<Tally>, Arc<Barrier>) {
    (
        Arc::clone(store),
        Arc::clone(path),
        Arc::clone(tally),
        Arc::clone(barrier),
    )
}
