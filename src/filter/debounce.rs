use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use super::FilterState;

enum KeywordEvent {
    Input(String),
    Commit,
}

/// Coalesces keyword keystrokes into a single [`FilterState`] update.
///
/// Each [`input`](Self::input) restarts the quiet-period timer; the pending
/// value is applied once no input has arrived for the configured delay, or
/// immediately on [`commit`](Self::commit). Dropping the debouncer discards
/// any value still pending.
pub struct KeywordDebouncer {
    tx: mpsc::UnboundedSender<KeywordEvent>,
    handle: JoinHandle<()>,
}

impl KeywordDebouncer {
    /// Start the debounce task writing into `filters`.
    pub fn spawn(filters: FilterState, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(filters, delay, rx));
        Self { tx, handle }
    }

    /// Record the latest text of the keyword input.
    pub fn input(&self, value: impl Into<String>) {
        let _ = self.tx.send(KeywordEvent::Input(value.into()));
    }

    /// Apply the pending value now (e.g. the user pressed Enter).
    pub fn commit(&self) {
        let _ = self.tx.send(KeywordEvent::Commit);
    }
}

impl Drop for KeywordDebouncer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(
    filters: FilterState,
    delay: Duration,
    mut rx: mpsc::UnboundedReceiver<KeywordEvent>,
) {
    let mut pending: Option<String> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(KeywordEvent::Input(value)) => {
                    pending = Some(value);
                    deadline = Some(Instant::now() + delay);
                }
                Some(KeywordEvent::Commit) => {
                    deadline = None;
                    apply(&filters, pending.take());
                }
                None => break,
            },

            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                apply(&filters, pending.take());
            }
        }
    }
}

fn apply(filters: &FilterState, value: Option<String>) {
    if let Some(value) = value {
        tracing::debug!(keyword = %value, "Keyword settled");
        filters.set_keyword(Some(value));
    }
}
