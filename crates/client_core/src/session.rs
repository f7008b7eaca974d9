use std::sync::Arc;

use shared::{
    domain::{ActiveView, LocationId},
    error::LocationError,
};
use tokio::{
    sync::{
        broadcast::{self, error::RecvError},
        Mutex,
    },
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    orchestrator::{FetchBundle, FetchOrchestrator},
    state::{DashboardSnapshot, LoadReason, LoadState, LoadTicket, SettleOutcome, ViewState},
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum SessionEvent {
    LoadingStarted {
        seq: u64,
        location: LocationId,
        reason: LoadReason,
    },
    DataAvailable(Box<DashboardSnapshot>),
    StaleResultDiscarded {
        seq: u64,
        location: LocationId,
    },
    ViewChanged(ActiveView),
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// Abort the in-flight invocation when a newer one is issued. Results are
    /// fenced either way.
    pub cancel_superseded: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            cancel_superseded: true,
        }
    }
}

struct SessionInner {
    state: ViewState,
    inflight: Option<(u64, JoinHandle<()>)>,
}

/// Async owner of the dashboard state.
///
/// Commands mutate state under one lock and spawn one task per fetch
/// invocation; a task only publishes if its ticket is still the latest.
pub struct DashboardSession {
    orchestrator: FetchOrchestrator,
    options: SessionOptions,
    inner: Mutex<SessionInner>,
    events: broadcast::Sender<SessionEvent>,
}

impl DashboardSession {
    /// Must run inside a tokio runtime; the initial load is spawned right away.
    pub async fn start(
        orchestrator: FetchOrchestrator,
        location: LocationId,
        options: SessionOptions,
    ) -> Arc<Self> {
        let (state, ticket) = ViewState::initial(location);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let session = Arc::new(Self {
            orchestrator,
            options,
            inner: Mutex::new(SessionInner {
                state,
                inflight: None,
            }),
            events,
        });

        {
            let mut guard = session.inner.lock().await;
            session.spawn_load(&mut guard, ticket);
        }
        session
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.inner.lock().await.state.snapshot().clone()
    }

    /// Returns the sequence number of the load it started, or `None` when the
    /// location is already selected.
    pub async fn select_location(
        self: &Arc<Self>,
        raw: &str,
    ) -> Result<Option<u64>, LocationError> {
        let location = LocationId::parse(raw)?;
        let mut guard = self.inner.lock().await;
        let Some(ticket) = guard.state.select_location(location) else {
            debug!(location = raw.trim(), "location already selected");
            return Ok(None);
        };
        info!(location = %ticket.location, seq = ticket.seq, "location selected");
        let seq = ticket.seq;
        self.spawn_load(&mut guard, ticket);
        Ok(Some(seq))
    }

    pub async fn trigger_refresh(self: &Arc<Self>) -> u64 {
        let mut guard = self.inner.lock().await;
        let ticket = guard.state.refresh();
        debug!(location = %ticket.location, seq = ticket.seq, "refresh requested");
        let seq = ticket.seq;
        self.spawn_load(&mut guard, ticket);
        seq
    }

    /// Navigation only; never touches the provider.
    pub async fn select_view(&self, view: ActiveView) {
        let changed = self.inner.lock().await.state.select_view(view);
        if changed {
            debug!(view = %view, "view selected");
            let _ = self.events.send(SessionEvent::ViewChanged(view));
        }
    }

    /// Resolves with the first snapshot observed in `Ready`.
    pub async fn wait_until_ready(&self) -> DashboardSnapshot {
        let mut events = self.events.subscribe();
        loop {
            {
                let guard = self.inner.lock().await;
                if guard.state.snapshot().load_state == LoadState::Ready {
                    return guard.state.snapshot().clone();
                }
            }
            match events.recv().await {
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return self.snapshot().await,
            }
        }
    }

    fn spawn_load(self: &Arc<Self>, inner: &mut SessionInner, ticket: LoadTicket) {
        if let Some((seq, handle)) = inner.inflight.take() {
            if self.options.cancel_superseded && !handle.is_finished() {
                debug!(seq, "aborting superseded fetch");
                handle.abort();
            }
        }

        let _ = self.events.send(SessionEvent::LoadingStarted {
            seq: ticket.seq,
            location: ticket.location.clone(),
            reason: ticket.reason,
        });

        let seq = ticket.seq;
        let session = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let bundle = session.orchestrator.fetch_all(&ticket.location).await;
            session.settle(ticket, bundle).await;
        });
        inner.inflight = Some((seq, handle));
    }

    async fn settle(&self, ticket: LoadTicket, bundle: FetchBundle) {
        let mut guard = self.inner.lock().await;
        match guard.state.settle(&ticket, bundle) {
            SettleOutcome::Applied => {
                if matches!(guard.inflight, Some((seq, _)) if seq == ticket.seq) {
                    guard.inflight = None;
                }
                let snapshot = guard.state.snapshot().clone();
                debug!(location = %snapshot.location, seq = ticket.seq, "snapshot ready");
                let _ = self
                    .events
                    .send(SessionEvent::DataAvailable(Box::new(snapshot)));
            }
            SettleOutcome::Stale { latest_seq } => {
                warn!(
                    location = %ticket.location,
                    seq = ticket.seq,
                    latest_seq,
                    "discarding result of superseded fetch"
                );
                let _ = self.events.send(SessionEvent::StaleResultDiscarded {
                    seq: ticket.seq,
                    location: ticket.location,
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
