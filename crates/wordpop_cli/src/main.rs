//! `wordpop` executable.
//!
//! # Responsibility
//! - Stand in for the extension entry points (selection trigger, shortcut,
//!   options page, raw message channel) on the command line.
//! - Wire configuration, logging, storage and clients into `wordpop_core`.

mod cli;

fn main() {
    if let Err(err) = cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
