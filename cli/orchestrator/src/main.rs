// SPDX-License-Identifier: CC0-1.0

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]

//! `modane-headless` entry point. Always exits with status 0.

use config::Config;

fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            println!("Error: {e}");
            return;
        }
    };
    logging::init(&config.logging.level);
    tracing::debug!(level = %config.logging.level, "configuration loaded");

    let outcome = modane_cli::execute(std::env::args_os());
    tracing::debug!(?outcome, "modane-headless finished");
}
