//! Lookup lifecycle controller.
//!
//! Owns the [`SessionController`], issues fetches as tokio tasks and emits
//! state snapshots for presentation layers. Commands and completed fetches are
//! handled one at a time from a single loop.

use super::post_process::process_lookup_completion;
use super::session::{Applied, LookupTicket, RequestToken, SessionController};
use crate::error::FetchError;
use crate::model::{InfoEvent, Report, SessionEvent};
use crate::service::ReportFetcher;
use anyhow::Result;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Submit(String),
    ClearHistory,
    Quit,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ControllerOptions {
    /// Abort the in-flight fetch when a newer lookup supersedes it.
    pub cancel_superseded: bool,
    pub export_json: Option<PathBuf>,
}

type Completion = (RequestToken, Result<Report, FetchError>);

/// Spawn the fetch for `ticket`; its outcome comes back on `done_tx`.
fn spawn_lookup(
    fetcher: Arc<dyn ReportFetcher>,
    ticket: LookupTicket,
    done_tx: UnboundedSender<Completion>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        // A panicking fetch still settles its token, as a failure.
        let outcome = AssertUnwindSafe(fetcher.fetch(&ticket.symbol))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                tracing::error!(symbol = %ticket.symbol, "fetch task panicked");
                Err(FetchError::transport("lookup task panicked"))
            });
        let _ = done_tx.send((ticket.token, outcome));
    })
}

/// Run lookups based on UI commands until `Quit` or the command channel closes.
/// Returns the session so callers can inspect the final state.
pub(crate) async fn run_controller(
    mut session: SessionController,
    fetcher: Arc<dyn ReportFetcher>,
    opts: ControllerOptions,
    event_tx: UnboundedSender<SessionEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<SessionController> {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
    let mut latest_task: Option<JoinHandle<()>> = None;

    let _ = event_tx.send(SessionEvent::State(session.state().clone()));
    let _ = event_tx.send(SessionEvent::History(session.history().entries().to_vec()));

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Submit(raw)) => {
                        let Some(ticket) = session.submit(&raw) else {
                            continue;
                        };
                        if let Some(prev) = latest_task.take() {
                            if opts.cancel_superseded && !prev.is_finished() {
                                tracing::debug!("aborting superseded fetch");
                                prev.abort();
                            }
                        }
                        latest_task = Some(spawn_lookup(fetcher.clone(), ticket, done_tx.clone()));
                        let _ = event_tx.send(SessionEvent::State(session.state().clone()));
                    }
                    Some(UiCommand::ClearHistory) => {
                        session.clear_history();
                        let _ = event_tx.send(SessionEvent::History(Vec::new()));
                        let _ = event_tx.send(SessionEvent::Info(InfoEvent::HistoryCleared));
                    }
                    Some(UiCommand::Quit) | None => break,
                }
            }
            Some((token, outcome)) = done_rx.recv() => {
                let applied = session.complete(token, outcome);
                if applied == Applied::Stale {
                    continue;
                }
                let _ = event_tx.send(SessionEvent::State(session.state().clone()));
                if applied == Applied::Loaded {
                    let _ = event_tx.send(SessionEvent::History(session.history().entries().to_vec()));
                    for info in process_lookup_completion(opts.export_json.as_deref(), session.state()) {
                        let _ = event_tx.send(SessionEvent::Info(info));
                    }
                }
            }
        }
    }

    // Nobody is left to observe an outstanding lookup.
    if let Some(task) = latest_task.take() {
        task.abort();
    }
    Ok(session)
}

/// Submit `raw_input` and wait for its single outcome. Used by the one-shot
/// CLI modes; returns `None` for blank input.
pub(crate) async fn lookup_once(
    session: &mut SessionController,
    fetcher: &dyn ReportFetcher,
    raw_input: &str,
) -> Option<Applied> {
    let ticket = session.submit(raw_input)?;
    let outcome = fetcher.fetch(&ticket.symbol).await;
    Some(session.complete(ticket.token, outcome))
}
