//! SPK generator: turns customer-arrears spreadsheets into printable two-up
//! work-order notices (penyegelan / pencabutan).

use clap::Parser;

pub mod cli;
pub mod config;
pub mod source;
pub mod spk;
pub mod surface;

pub use crate::config::SpkConfig;
pub use crate::spk::{CustomerRecord, DocumentType, SpkError, SpkGenerator};

/// Parse arguments, set up logging and configuration, then dispatch.
pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = cli::Cli::parse();
    let config = cli.apply(SpkConfig::from_env());
    log::debug!("Using configuration {:?}", config);

    cli::run(cli, config)
}
