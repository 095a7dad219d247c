use anyhow::Result;
use clap::Parser;
use gantry_core::command_store::CommandName;
use gantry_zenoh::{error::BusError, load_zenoh_config, logging, COMMAND_TOPIC};
use std::path::PathBuf;
use zenoh::prelude::r#async::*;

/// Publish a single command name on the relay topic and exit.
#[derive(Parser)]
#[command(author, version)]
struct Args {
    /// Command name to publish
    #[arg()]
    command: String,

    /// Zenoh config file
    #[arg(long)]
    zenoh_config: Option<PathBuf>,

    /// Sets the level of verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::setup_tracing(args.verbose);

    // reject garbage here rather than on the relay side
    let command: CommandName = args.command.parse()?;

    let zenoh_config = load_zenoh_config(&args.zenoh_config)?;
    let session = zenoh::open(zenoh_config)
        .res()
        .await
        .map_err(BusError::Zenoh)?;
    session
        .put(COMMAND_TOPIC, command.as_str())
        .res()
        .await
        .map_err(BusError::Zenoh)?;
    session
        .close()
        .res()
        .await
        .map_err(BusError::Zenoh)?;

    tracing::info!("Published {} to {}", command, COMMAND_TOPIC);
    Ok(())
}
