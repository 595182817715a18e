//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend. A command that could not be queued is handed
/// back so the caller can settle the state that was waiting on it.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> Result<(), BackendCommand> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(cmd)) => {
            *status = "UI command queue is full; please retry".to_string();
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            Err(cmd)
        }
        Err(TrySendError::Disconnected(cmd)) => {
            *status =
                "Backend command processor disconnected (possible startup failure); restart the viewer"
                    .to_string();
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
            Err(cmd)
        }
    }
}
