//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues without blocking the frame. Returns false and fills `status` when the queue refused it.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "ui command queue full");
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend worker gone");
            *status = "Backend command processor disconnected; restart the app".to_string();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::LoadToken;
    use crossbeam_channel::bounded;

    #[test]
    fn full_queue_reports_retry() {
        let (tx, _rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(
            &tx,
            BackendCommand::LoadAll {
                token: LoadToken::next()
            },
            &mut status
        ));
        assert!(!dispatch_backend_command(
            &tx,
            BackendCommand::LoadAll {
                token: LoadToken::next()
            },
            &mut status
        ));
        assert!(status.contains("full"));
    }

    #[test]
    fn dropped_worker_reports_disconnect() {
        let (tx, rx) = bounded(4);
        drop(rx);
        let mut status = String::new();
        assert!(!dispatch_backend_command(
            &tx,
            BackendCommand::FetchImage {
                url: "https://img.example/a.png".to_string()
            },
            &mut status
        ));
        assert!(status.contains("disconnected"));
    }
}
