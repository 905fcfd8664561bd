//! Per-pair actor.
//!
//! Each pair runs in its own task that owns the pair's [`PairEngine`].
//! Ticks, force-sell requests and snapshots arrive on the mailbox; venue
//! calls run in spawned tasks and report back on a separate completion
//! channel. Every mutation of the position happens inside the actor loop,
//! one message at a time.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::application::{Command, Completion, PairEngine};
use crate::domain::{PairId, Position};
use crate::error::{Error, Result};
use crate::port::Exchange;

/// Mailbox capacity per pair.
pub const MAILBOX_CAPACITY: usize = 64;

/// Messages accepted by a pair worker.
#[derive(Debug)]
pub enum PairMessage {
    /// Advance the state machine at the given instant.
    Tick(DateTime<Utc>),
    /// Re-offer the held amount on the next sell-management tick.
    ForceSell,
    /// Reply with a copy of the current position.
    Snapshot(oneshot::Sender<Position>),
}

/// Cloneable handle to a running pair worker.
#[derive(Debug, Clone)]
pub struct PairHandle {
    pair: PairId,
    mailbox: mpsc::Sender<PairMessage>,
}

impl PairHandle {
    #[must_use]
    pub fn pair(&self) -> &PairId {
        &self.pair
    }

    /// Deliver a tick without waiting.
    ///
    /// A full mailbox means the worker is behind; the tick is dropped, since
    /// the next one re-evaluates everything anyway.
    pub fn tick(&self, now: DateTime<Utc>) -> Result<()> {
        match self.mailbox.try_send(PairMessage::Tick(now)) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!(pair = %self.pair, "Mailbox full, dropping tick");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(Error::WorkerStopped(self.pair.clone()))
            }
        }
    }

    pub async fn force_sell(&self) -> Result<()> {
        self.mailbox
            .send(PairMessage::ForceSell)
            .await
            .map_err(|_| Error::WorkerStopped(self.pair.clone()))
    }

    pub async fn snapshot(&self) -> Result<Position> {
        let (reply, response) = oneshot::channel();
        self.mailbox
            .send(PairMessage::Snapshot(reply))
            .await
            .map_err(|_| Error::WorkerStopped(self.pair.clone()))?;
        response
            .await
            .map_err(|_| Error::WorkerStopped(self.pair.clone()))
    }
}

/// Start a worker for `engine`.
///
/// The worker stops once every [`PairHandle`] for it has been dropped.
/// Venue calls already in flight run to completion; their results are
/// discarded.
pub fn spawn_worker(engine: PairEngine, exchange: Arc<dyn Exchange>) -> (PairHandle, JoinHandle<()>) {
    let (mailbox, inbox) = mpsc::channel(MAILBOX_CAPACITY);
    let handle = PairHandle {
        pair: engine.pair().clone(),
        mailbox,
    };
    let join = tokio::spawn(run(engine, exchange, inbox));
    (handle, join)
}

async fn run(
    mut engine: PairEngine,
    exchange: Arc<dyn Exchange>,
    mut inbox: mpsc::Receiver<PairMessage>,
) {
    let (completion_tx, mut completions) = mpsc::unbounded_channel::<Completion>();
    let pair = engine.pair().clone();
    info!(pair = %pair, "Pair worker started");

    loop {
        tokio::select! {
            message = inbox.recv() => {
                let Some(message) = message else {
                    break;
                };
                match message {
                    PairMessage::Tick(now) => {
                        if let Some(command) = engine.tick(now) {
                            dispatch(command, Arc::clone(&exchange), completion_tx.clone());
                        }
                    }
                    PairMessage::ForceSell => engine.request_force_sell(),
                    PairMessage::Snapshot(reply) => {
                        let _ = reply.send(engine.position().clone());
                    }
                }
            }
            Some(completion) = completions.recv() => {
                if let Some(command) = engine.complete(completion, Utc::now()) {
                    dispatch(command, Arc::clone(&exchange), completion_tx.clone());
                }
            }
        }
    }

    info!(pair = %pair, phase = %engine.position().phase(), "Pair worker stopped");
}

fn dispatch(
    command: Command,
    exchange: Arc<dyn Exchange>,
    completions: mpsc::UnboundedSender<Completion>,
) {
    debug!(pair = %command.pair, request = %command.request, action = ?command.action, "Dispatching command");
    tokio::spawn(async move {
        let completion = command.execute(exchange.as_ref()).await;
        if completions.send(completion).is_err() {
            debug!("Pair worker gone, dropping completion");
        }
    });
}
