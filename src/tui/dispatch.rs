use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use crate::io::Store;

use super::command::Command;
use super::message::Message;

/// Runs commands off the UI loop. Each command becomes its own task and
/// sends exactly one message back; nothing orders results across commands.
pub struct Dispatcher {
    store: Arc<dyn Store>,
    runtime: Handle,
    tx: UnboundedSender<Message>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn Store>, runtime: Handle, tx: UnboundedSender<Message>) -> Self {
        Dispatcher { store, runtime, tx }
    }

    /// Start every command and return immediately.
    pub fn dispatch(&self, commands: Vec<Command>) {
        for command in commands {
            self.spawn(command);
        }
    }

    fn spawn(&self, command: Command) {
        let what = command.label();
        tracing::debug!(command = what, "dispatch");
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = tokio::task::spawn_blocking(move || command.execute(store.as_ref())).await;
            let msg = match result {
                Ok(msg) => msg,
                Err(e) => Message::Failed {
                    what,
                    reason: format!("worker failed: {e}"),
                },
            };
            if let Message::Failed { what, reason } = &msg {
                tracing::warn!(command = what, %reason, "command failed");
            }
            // The loop may already be gone on shutdown
            let _ = tx.send(msg);
        });
    }
}
