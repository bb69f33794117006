#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! macblk — list block devices on macOS, lsblk-style.

mod cli;
mod device;
mod errors;
mod render;
mod run;
mod topology;
mod types;

use clap::Parser;

use cli::{Cli, write_error};
use types::ErrorOutput;

fn main() {
    let cli = Cli::parse();

    match run::run(&cli) {
        Ok(()) => {}
        Err(err) => {
            let wants_json = cli.json || cli.format.eq_ignore_ascii_case("json");
            write_error(&ErrorOutput::from_run_error(&err), wants_json);
            std::process::exit(err.exit_code());
        }
    }
}
