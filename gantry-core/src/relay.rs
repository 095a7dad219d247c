use crate::{
    command_store::{CommandName, CommandStore, InvalidCommandName, StoreError},
    path_command::DEFAULT_RADIUS_MM,
    robot_transport::{DeliveryOutcome, RobotTransport, TransportError},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error(transparent)]
    InvalidName(#[from] InvalidCommandName),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Dispatch core: one inbound command name in, one delivery attempt out.
///
/// Events are handled to completion one at a time. A failed event never
/// takes the relay down; the error aborts that event only and the caller
/// keeps consuming the bus.
pub struct CommandRelay {
    store: CommandStore,
    transport: Box<dyn RobotTransport>,
    dry_run: bool,
}

impl CommandRelay {
    pub fn new(
        store: CommandStore,
        transport: Box<dyn RobotTransport>,
        dry_run: bool,
    ) -> CommandRelay {
        CommandRelay {
            store,
            transport,
            dry_run,
        }
    }

    /// Handle one inbound event carrying a command name.
    ///
    /// The raw text is trimmed and validated before any file or network
    /// access. Delivery timeouts and network faults are logged outcomes,
    /// not errors; only invalid names, store faults, and a missing
    /// endpoint configuration surface as [`RelayError`].
    pub async fn handle_event(&self, raw: &str) -> Result<(), RelayError> {
        let name: CommandName = raw.trim().parse()?;
        tracing::info!("Received command {}", name);

        let payload = self.store.resolve(&name, DEFAULT_RADIUS_MM)?;
        tracing::debug!("Resolved payload:\n{}", payload);

        if self.dry_run {
            tracing::info!("Dry run enabled, not sending to robot");
            return Ok(());
        }

        match self.transport.deliver(&payload).await? {
            DeliveryOutcome::Sent { bytes } => {
                tracing::info!("Sent payload ({} bytes)", bytes);
            }
            DeliveryOutcome::TimedOut => {
                tracing::warn!("Delivery timed out");
            }
            DeliveryOutcome::NetworkFault(error) => {
                tracing::warn!("Delivery failed: {}", error);
            }
        }
        Ok(())
    }
}
