//! Many threads against one document
//!
//! Every document written here is self-checking: `payload` is `writer`
//! repeated `len` times, so a torn or interleaved document either fails to
//! decode or fails `is_intact`.

use httpino_core::{Store, StoreConfig};
use httpino_testkit::{file_names, temp_dir_in_workspace};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Stamp {
    writer: usize,
    len: usize,
    payload: Vec<usize>,
}

impl Stamp {
    fn new(writer: usize) -> Self {
        // Vary sizes so that stale tails would show up
        let len = 1 + (writer * 37) % 400;
        Self {
            writer,
            len,
            payload: vec![writer; len],
        }
    }

    fn is_intact(&self) -> bool {
        self.payload.len() == self.len && self.payload.iter().all(|&w| w == self.writer)
    }
}

fn patient_store() -> Store {
    let mut config = StoreConfig::default();
    config.lock.timeout_ms = 60_000;
    Store::new(config)
}

#[test]
fn test_concurrent_writers_leave_one_complete_document() {
    const WRITERS: usize = 64;

    let temp = temp_dir_in_workspace();
    let path = Arc::new(temp.path().join("contended.json"));
    let store = Arc::new(patient_store());
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let path = Arc::clone(&path);
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.write(&*path, &Stamp::new(writer)).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let stamp: Stamp = store.read(&*path).unwrap().expect("document present");
    assert!(stamp.is_intact(), "torn document: {:?}", stamp);

    // No trailing bytes from a longer predecessor
    let expected_len = serde_json::to_vec(&Stamp::new(stamp.writer)).unwrap().len() as u64;
    assert_eq!(fs::metadata(&*path).unwrap().len(), expected_len);

    // Only the document itself remains; every staging file was removed
    assert_eq!(file_names(temp.path()), vec!["contended.json"]);
}

#[test]
fn test_readers_never_observe_partial_writes() {
    const WRITERS: usize = 8;
    const READERS: usize = 8;
    const ROUNDS: usize = 25;

    let temp = temp_dir_in_workspace();
    let path = Arc::new(temp.path().join("mixed.json"));
    let store = Arc::new(patient_store());
    store.write(&*path, &Stamp::new(0)).unwrap();

    let barrier = Arc::new(Barrier::new(WRITERS + READERS));
    let complete_reads = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::new();

    for writer in 0..WRITERS {
        let path = Arc::clone(&path);
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for round in 0..ROUNDS {
                store
                    .write(&*path, &Stamp::new(writer * ROUNDS + round))
                    .unwrap();
            }
        }));
    }

    for _ in 0..READERS {
        let path = Arc::clone(&path);
        let store = Arc::clone(&store);
        let barrier = Arc::clone(&barrier);
        let complete_reads = Arc::clone(&complete_reads);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..ROUNDS {
                let stamp: Stamp = store
                    .read(&*path)
                    .unwrap()
                    .expect("a written document is never empty");
                assert!(stamp.is_intact(), "reader saw {:?}", stamp);
                complete_reads.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(complete_reads.load(Ordering::Relaxed), READERS * ROUNDS);
}

#[test]
fn test_writers_on_different_files_do_not_interfere() {
    let temp = temp_dir_in_workspace();
    let store = Arc::new(patient_store());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let path = temp.path().join(format!("doc-{i}.json"));
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..10 {
                    store.write(&path, &Stamp::new(i)).unwrap();
                }
                path
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let path = handle.join().unwrap();
        assert_eq!(store.read::<Stamp>(&path).unwrap(), Some(Stamp::new(i)));
    }
}

#[test]
fn test_read_waits_for_held_write_lock() {
    use httpino_core::lock::{lock_exclusive, LockPolicy};

    let temp = temp_dir_in_workspace();
    let path = temp.path().join("held.json");
    let store = patient_store();
    store.write(&path, &Stamp::new(1)).unwrap();

    // Simulate a writer that is mid-replacement: locked and emptied
    let file = fs::OpenOptions::new().write(true).open(&path).unwrap();
    let guard = lock_exclusive(file, &path, &LockPolicy::default()).unwrap();
    guard.set_len(0).unwrap();

    let reader_path = path.clone();
    let reader = thread::spawn(move || patient_store().read::<Stamp>(&reader_path));

    thread::sleep(Duration::from_millis(100));
    let mut out: &fs::File = guard.file();
    out.write_all(&serde_json::to_vec(&Stamp::new(2)).unwrap())
        .unwrap();
    drop(guard);

    assert_eq!(reader.join().unwrap().unwrap(), Some(Stamp::new(2)));
}
