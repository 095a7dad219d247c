use anyhow::Result;
use clap::Parser;
use gantry_core::{
    command_store::CommandStore,
    relay::CommandRelay,
    relay_config::RelayConfig,
    robot_transport::TcpTransport,
};
use gantry_zenoh::{
    error::BusError, load_zenoh_config, logging, COMMAND_TOPIC, HEARTBEAT_COMMAND,
};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::watch;
use zenoh::prelude::r#async::*;

const HEARTBEAT_PERIOD: Duration = Duration::from_secs(60);

#[derive(Parser)]
#[command(author, version)]
struct Args {
    /// Resolve and log payloads without sending to the robot
    #[arg(long)]
    dry_run: bool,

    /// Publish a synthetic test command every 60 seconds
    #[arg(long)]
    self_trigger: bool,

    /// Relay config file (.json or .yaml); environment variables otherwise
    #[arg(long)]
    config: Option<PathBuf>,

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

    let config = load_relay_config(&args.config)?;
    tracing::info!(
        "Relaying commands from {:?} to {}",
        config.store_path,
        config.endpoint().address()
    );
    let relay = CommandRelay::new(
        CommandStore::new(&config.store_path),
        Box::new(TcpTransport::new(config.endpoint())),
        args.dry_run,
    );

    let zenoh_config = load_zenoh_config(&args.zenoh_config)?;
    let session = zenoh::open(zenoh_config)
        .res()
        .await
        .map_err(BusError::Zenoh)?
        .into_arc();

    let subscriber = session
        .declare_subscriber(COMMAND_TOPIC)
        .res()
        .await
        .map_err(BusError::Zenoh)?;
    tracing::info!("Listening on {}", COMMAND_TOPIC);

    let (shutdown_sender, shutdown_receiver) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_shutdown().await;
        tracing::info!("Shutdown signal received");
        let _ = shutdown_sender.send(true);
    });

    if args.self_trigger {
        tokio::spawn(heartbeat_loop(session.clone(), shutdown_receiver.clone()));
    }

    // single dispatch loop: one event handled to completion before the next
    let mut shutdown_receiver = shutdown_receiver;
    loop {
        tokio::select! {
            _ = shutdown_receiver.changed() => break,
            sample = subscriber.recv_async() => {
                let Ok(sample) = sample else { break };
                let data: std::result::Result<String, _> = sample.value.try_into();
                match data {
                    Ok(data) => {
                        if let Err(error) = relay.handle_event(&data).await {
                            tracing::error!("Dropping event: {}", error);
                        }
                    }
                    Err(error) => tracing::warn!("Undecodable bus message: {:?}", error),
                }
            }
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

fn load_relay_config(path: &Option<PathBuf>) -> Result<RelayConfig> {
    let config = match path {
        Some(path) if path.extension().is_some_and(|ext| ext == "json") => {
            RelayConfig::load_json(&path.to_string_lossy())?
        }
        Some(path) => RelayConfig::load_yaml(&path.to_string_lossy())?,
        None => RelayConfig::from_env()?,
    };
    Ok(config)
}

async fn wait_for_shutdown() {
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .expect("Failed to register SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => (),
        _ = sigterm.recv() => (),
    }
}

/// Publish a synthetic test command on the bus until shutdown.
///
/// Runs through the same event path as real commands. Reacts to the stop
/// signal immediately, well inside the one second shutdown budget.
async fn heartbeat_loop(session: Arc<zenoh::Session>, mut shutdown: watch::Receiver<bool>) {
    loop {
        if let Err(error) = session.put(COMMAND_TOPIC, HEARTBEAT_COMMAND).res().await {
            tracing::warn!("Failed to publish heartbeat: {:?}", error);
        }
        tokio::select! {
            _ = shutdown.changed() => return,
            _ = tokio::time::sleep(HEARTBEAT_PERIOD) => (),
        }
    }
}
