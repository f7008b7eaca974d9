//! Worker thread that owns the tokio runtime and the dashboard session.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use anyhow::Context;
use client_core::{
    session::SessionEvent, DashboardSession, FetchOrchestrator, HttpProvider, Settings,
};
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::broadcast::error::RecvError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Builds the HTTP provider from `settings` and starts a session on the
/// configured default location. Must be called inside a tokio runtime.
pub async fn start_session(settings: &Settings) -> anyhow::Result<Arc<DashboardSession>> {
    let provider_config = settings.provider_config()?;
    let location = settings.default_location()?;
    tracing::info!(
        base_url = %provider_config.base_url,
        location = %location,
        "starting dashboard session"
    );
    let provider = HttpProvider::new(provider_config).context("failed to build http provider")?;
    let orchestrator = FetchOrchestrator::new(Arc::new(provider));
    Ok(DashboardSession::start(orchestrator, location, settings.session_options()).await)
}

pub fn launch(
    settings: Settings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::Stopped);
                return;
            }
        };

        let worker_tx = ui_tx.clone();
        runtime.block_on(async move {
            let session = match start_session(&settings).await {
                Ok(session) => session,
                Err(err) => {
                    let _ = worker_tx.try_send(UiEvent::Error(format!(
                        "backend worker startup failure: {err:#}"
                    )));
                    tracing::error!("failed to start dashboard session: {err:#}");
                    return;
                }
            };

            let forwarder = tokio::spawn(forward_session_events(
                Arc::clone(&session),
                worker_tx.clone(),
            ));

            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend received command");
                match cmd {
                    BackendCommand::SelectLocation { raw } => {
                        match session.select_location(&raw).await {
                            Ok(Some(_)) => {}
                            Ok(None) => {
                                let _ = worker_tx.try_send(UiEvent::Info(format!(
                                    "{} is already selected",
                                    raw.trim()
                                )));
                            }
                            Err(err) => {
                                let _ = worker_tx.try_send(UiEvent::Error(err.to_string()));
                            }
                        }
                    }
                    BackendCommand::Refresh => {
                        session.trigger_refresh().await;
                    }
                    BackendCommand::SelectView { view } => {
                        session.select_view(view).await;
                    }
                    BackendCommand::Shutdown => break,
                }
            }

            forwarder.abort();
            tracing::info!("backend worker stopped");
        });

        let _ = ui_tx.try_send(UiEvent::Stopped);
    })
}

async fn forward_session_events(session: Arc<DashboardSession>, ui_tx: Sender<UiEvent>) {
    let mut events = session.subscribe_events();
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "output loop lagged behind session events");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        let ui_event = match event {
            SessionEvent::ViewChanged(_) => {
                Some(UiEvent::SnapshotUpdated(Box::new(session.snapshot().await)))
            }
            other => UiEvent::from_session(other),
        };

        if let Some(ui_event) = ui_event {
            if ui_tx.send(ui_event).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn failed_startup_reports_error_then_stops() {
        let settings = Settings {
            api_base_url: "ftp://aq.example.org/api".into(),
            ..Settings::default()
        };
        let (_cmd_tx, cmd_rx) = bounded::<BackendCommand>(4);
        let (ui_tx, ui_rx) = bounded::<UiEvent>(16);

        let worker = launch(settings, cmd_rx, ui_tx);

        let first = ui_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("startup error event");
        match first {
            UiEvent::Error(message) => assert!(message.contains("startup failure")),
            other => panic!("expected startup error, got {other:?}"),
        }
        assert!(matches!(
            ui_rx.recv_timeout(Duration::from_secs(5)),
            Ok(UiEvent::Stopped)
        ));
        worker.join().expect("worker thread");
    }
}
