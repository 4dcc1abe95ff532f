//! Debounced persistence.
//!
//! A single background task owns at most one pending config. Every
//! [`Autosave::schedule`] replaces it and pushes the deadline out; the save
//! runs once the config has been left alone for the whole delay.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use relo_core::config::AppConfig;
use relo_runtime::Backend;

/// Quiet period required before a change is written.
pub const AUTOSAVE_DELAY: Duration = Duration::from_millis(800);

enum Command {
    Schedule(AppConfig),
    Flush(oneshot::Sender<()>),
}

/// Handle to the autosave task.
pub struct Autosave {
    tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl Autosave {
    /// Must be called from within a tokio runtime.
    pub fn spawn<B: Backend>(backend: Arc<B>, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(backend, delay, rx));
        Self { tx, task }
    }

    /// Replace the pending config and restart the quiet period.
    pub fn schedule(&self, config: AppConfig) {
        if self.tx.send(Command::Schedule(config)).is_err() {
            tracing::warn!("Autosave task has stopped, change not persisted");
        }
    }

    /// Write the pending config now, if there is one.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Flush and stop the task.
    pub async fn shutdown(self) {
        self.flush().await;
        drop(self.tx);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Autosave task panicked");
        }
    }
}

async fn run<B: Backend>(
    backend: Arc<B>,
    delay: Duration,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    let mut pending: Option<(Instant, AppConfig)> = None;

    loop {
        let deadline = pending.as_ref().map(|(at, _)| *at);

        tokio::select! {
            cmd = rx.recv() => match cmd {
                Some(Command::Schedule(config)) => {
                    pending = Some((Instant::now() + delay, config));
                }
                Some(Command::Flush(done)) => {
                    if let Some((_, config)) = pending.take() {
                        save(backend.as_ref(), config).await;
                    }
                    let _ = done.send(());
                }
                None => {
                    if let Some((_, config)) = pending.take() {
                        save(backend.as_ref(), config).await;
                    }
                    break;
                }
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some((_, config)) = pending.take() {
                    save(backend.as_ref(), config).await;
                }
            }
        }
    }
}

async fn save<B: Backend>(backend: &B, config: AppConfig) {
    match backend.save_config(config).await {
        Ok(()) => tracing::debug!("Config autosaved"),
        Err(e) => tracing::warn!(error = %e, "Failed to save config"),
    }
}
