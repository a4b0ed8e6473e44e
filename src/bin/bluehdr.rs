//! Print Blue File headers as JSON, one document per line.
//!
//! ```text
//! bluehdr [--strict] <FILE>...
//! ```
//!
//! `--strict` rejects malformed fixed keywords instead of skipping them.
//! Set `RUST_LOG=debug` to trace the decode.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use bluekit::{BlueFile, DecodeOptions, KeywordMode};
use log::error;

fn main() -> ExitCode {
    env_logger::init();

    let mut options = DecodeOptions::new();
    let mut paths = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--strict" => options = options.keyword_mode(KeywordMode::Strict),
            _ => paths.push(arg),
        }
    }

    if paths.is_empty() {
        eprintln!("usage: bluehdr [--strict] <FILE>...");
        return ExitCode::from(2);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut status = ExitCode::SUCCESS;
    for path in &paths {
        match BlueFile::open_with(path, options).and_then(|bf| bf.to_json()) {
            Ok(json) => {
                if writeln!(out, "{json}").is_err() {
                    return ExitCode::FAILURE;
                }
            }
            Err(e) => {
                error!("could not load header for {path}: {e}");
                eprintln!("{path}: {e}");
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}
