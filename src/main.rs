//! `blm` - backlog manager service over stdio.
//!
//! Reads newline-delimited JSON requests from stdin, applies them to the
//! JSON file store, and writes one response per line to stdout.

use backlog_manager::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
