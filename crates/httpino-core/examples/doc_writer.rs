//! Helper binary that repeatedly replaces a shared document
//!
//! Usage: doc_writer <path> <writer_id> <rounds>
//!
//! Each round writes a self-checking document whose payload is the round's
//! stamp repeated `len` times.

use httpino_core::Store;
use serde_json::json;
use std::env;
use std::path::PathBuf;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: doc_writer <path> <writer_id> <rounds>");
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    let writer: usize = args[2].parse().expect("writer_id must be a number");
    let rounds: usize = args[3].parse().expect("rounds must be a number");

    let store = Store::default();
    for round in 0..rounds {
        let stamp = writer * 10_000 + round;
        let len = 1 + (stamp * 37) % 300;
        let doc = json!({ "writer": stamp, "len": len, "payload": vec![stamp; len] });
        store.write(&path, &doc).expect("Failed to write document");
    }

    println!("Writer {} completed {} rounds", writer, rounds);
}
