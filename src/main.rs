// Entrypoint for the test harness.
// - Resolves the command line into a `RuntimeConfig`.
// - Builds one API client from it and hands it to the menu loop.
// - Logging goes to stderr via `env_logger`, controlled by `RUST_LOG`.

use anyhow::Context;
use std::process;
use vending_harness::api::ApiClient;
use vending_harness::config::{self, Resolution, USAGE};
use vending_harness::ui::main_menu;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match config::resolve(std::env::args().skip(1)) {
        Ok(Resolution::Run(config)) => config,
        Ok(Resolution::Help) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Err(e) => {
            println!("{}", e);
            println!("{}", USAGE);
            process::exit(1);
        }
    };

    let api = ApiClient::new(&config).context("Failed to build HTTP client")?;

    // Blocks until the operator enters `E` or stdin closes.
    main_menu(api).context("Menu session failed")?;
    Ok(())
}
