use serde_json::Value;
use std::io::{self, Write};

/// Prints a document on one line, or indented with `pretty`
pub fn print_document(document: &Value, pretty: bool) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, document)?;
    } else {
        serde_json::to_writer(&mut out, document)?;
    }
    writeln!(out)
}

pub fn print_line(s: &str) -> io::Result<()> {
    writeln!(io::stdout().lock(), "{s}")
}
