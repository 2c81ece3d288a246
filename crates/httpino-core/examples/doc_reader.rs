//! Helper binary that repeatedly reads and checks a shared document
//!
//! Usage: doc_reader <path> <rounds>
//!
//! Exits with status 2 if any read returns a torn document.

use httpino_core::Store;
use serde_json::Value;
use std::env;
use std::path::PathBuf;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: doc_reader <path> <rounds>");
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    let rounds: usize = args[2].parse().expect("rounds must be a number");

    let store = Store::default();
    for round in 0..rounds {
        let doc: Value = store
            .read(&path)
            .expect("Failed to read document")
            .expect("Document should never be empty");

        let writer = &doc["writer"];
        let len = doc["len"].as_u64().unwrap_or(0) as usize;
        let payload = doc["payload"].as_array().cloned().unwrap_or_default();
        if payload.len() != len || payload.iter().any(|v| v != writer) {
            eprintln!("Round {}: torn document {}", round, doc);
            std::process::exit(2);
        }
    }

    println!("Reader completed {} rounds", rounds);
}
