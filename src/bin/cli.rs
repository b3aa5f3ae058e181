// src/bin/cli.rs
use librus_scrape::{cli, log};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    log::init_logging();
    cli::run()?;
    Ok(())
}
