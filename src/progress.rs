//! Status lines shown while a batch is in flight.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::model::report::is_blank;

pub const DEFAULT_TICK: Duration = Duration::from_secs(2);
pub const FINALIZING_MESSAGE: &str = "Finalisiere Bericht...";
pub const REGENERATING_MESSAGE: &str = "Wird neu generiert...";

/// One "Formuliere <day>..." per day with an entry, then the final message.
pub fn loading_messages(inputs: &[String], days: &[String]) -> Vec<String> {
    inputs
        .iter()
        .zip(days)
        .filter(|(input, _)| !is_blank(input))
        .map(|(_, day)| format!("Formuliere {day}..."))
        .chain(std::iter::once(FINALIZING_MESSAGE.to_string()))
        .collect()
}

/// Emits the messages on a channel, the first one immediately and the rest
/// one per tick. Stops after the last message; aborted on drop.
pub struct ProgressTicker {
    rx: mpsc::Receiver<String>,
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    pub fn start(messages: Vec<String>, tick: Duration) -> Self {
        let (tx, rx) = mpsc::channel(messages.len().max(1));
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            for message in messages {
                interval.tick().await;
                if tx.send(message).await.is_err() {
                    break;
                }
            }
        });
        Self { rx, handle }
    }

    pub async fn next(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
