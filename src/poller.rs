//! Fixed-delay poll loop for the events endpoint.
//!
//! One task issues one `list_events` call per cycle and hands the outcome to
//! a [`Renderer`]. The next cycle is scheduled only after the previous one
//! has rendered, so requests never overlap.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use crate::client::{ClientError, EventsClient};
use crate::domain::WebhookEvent;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(15_000);

/// Display surface fed by the poller.
pub trait Renderer: Send {
    fn render_connected(&mut self, count: u64);
    fn render_disconnected(&mut self, error: &ClientError);
    fn render_events(&mut self, events: &[WebhookEvent]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    RenderedConnected,
    RenderedDisconnected,
    Stopped,
}

struct Shared {
    state: watch::Sender<PollState>,
    refresh: Notify,
    polls: AtomicU64,
}

pub struct Poller {
    client: Arc<dyn EventsClient>,
    interval: Duration,
}

impl Poller {
    pub fn new(client: Arc<dyn EventsClient>, interval: Duration) -> Self {
        Self { client, interval }
    }

    /// Spawns the loop and polls immediately. Must be called inside a tokio
    /// runtime.
    pub fn start<R: Renderer + 'static>(self, renderer: R) -> PollerHandle<R> {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (state, _) = watch::channel(PollState::Idle);
        let shared = Arc::new(Shared {
            state,
            refresh: Notify::new(),
            polls: AtomicU64::new(0),
        });

        tracing::info!(
            "started polling every {} seconds",
            self.interval.as_secs_f64()
        );
        let task = tokio::spawn(self.run(renderer, stop_rx, shared.clone()));

        PollerHandle {
            stop_tx,
            shared,
            task: Some(task),
        }
    }

    async fn run<R: Renderer>(
        self,
        mut renderer: R,
        mut stop_rx: watch::Receiver<bool>,
        shared: Arc<Shared>,
    ) -> R {
        loop {
            if *stop_rx.borrow() {
                break;
            }

            shared.state.send_replace(PollState::Polling);
            let cycle = shared.polls.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::debug!(cycle, "polling events");

            // Not raced against stop: an in-flight request runs to completion.
            let result = self.client.list_events().await;

            if *stop_rx.borrow() {
                tracing::debug!(cycle, "discarding poll result after stop");
                break;
            }

            match result {
                Ok(page) => {
                    tracing::debug!(cycle, count = page.count, "events loaded");
                    renderer.render_connected(page.count);
                    renderer.render_events(&page.events);
                    shared.state.send_replace(PollState::RenderedConnected);
                }
                Err(e) => {
                    tracing::warn!(cycle, "error fetching events: {}", e);
                    renderer.render_disconnected(&e);
                    shared.state.send_replace(PollState::RenderedDisconnected);
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shared.refresh.notified() => {
                    tracing::debug!(cycle, "refresh requested");
                }
                changed = stop_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        shared.state.send_replace(PollState::Stopped);
        tracing::info!("stopped polling");
        renderer
    }
}

/// Owner of a running poll loop. Dropping it stops the loop.
pub struct PollerHandle<R> {
    stop_tx: watch::Sender<bool>,
    shared: Arc<Shared>,
    task: Option<JoinHandle<R>>,
}

impl<R> PollerHandle<R> {
    /// Cancels the pending delay. A request already in flight is left alone
    /// and its result is dropped unrendered.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    /// Starts the next cycle now instead of waiting out the delay. While a
    /// request is in flight the refresh is held and fires once it renders;
    /// repeated refreshes collapse into one.
    pub fn refresh(&self) {
        self.shared.refresh.notify_one();
    }

    /// Requests issued so far.
    pub fn polls(&self) -> u64 {
        self.shared.polls.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> PollState {
        *self.shared.state.borrow()
    }

    /// Stops the loop and waits for it to wind down, returning the renderer.
    /// Waits for an in-flight request to resolve first.
    pub async fn shutdown(mut self) -> Option<R> {
        self.stop();
        let task = self.task.take()?;
        task.await.ok()
    }
}

impl<R> Drop for PollerHandle<R> {
    fn drop(&mut self) {
        self.stop();
    }
}
