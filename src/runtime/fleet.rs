//! The set of pair workers run by one strategy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::application::{PairEngine, StrategyContext};
use crate::domain::{PairId, Position};
use crate::error::{Error, Result};

use super::worker::{spawn_worker, PairHandle};

/// Registry of running pair workers sharing one [`StrategyContext`].
pub struct Fleet {
    ctx: Arc<StrategyContext>,
    workers: DashMap<PairId, PairHandle>,
    joins: Mutex<Vec<JoinHandle<()>>>,
}

impl Fleet {
    #[must_use]
    pub fn new(ctx: Arc<StrategyContext>) -> Self {
        Self {
            ctx,
            workers: DashMap::new(),
            joins: Mutex::new(Vec::new()),
        }
    }

    /// Start a fleet with one worker per pair.
    #[must_use]
    pub fn spawn(ctx: Arc<StrategyContext>, pairs: &[PairId]) -> Self {
        let fleet = Self::new(ctx);
        for pair in pairs {
            fleet.add_pair(pair.clone());
        }
        fleet
    }

    /// Start a worker for `pair`. Returns `false` if one is already running.
    pub fn add_pair(&self, pair: PairId) -> bool {
        if self.workers.contains_key(&pair) {
            return false;
        }
        self.add_engine(PairEngine::new(pair, Arc::clone(&self.ctx)))
    }

    /// Start a worker resuming from a captured position.
    pub fn resume(&self, position: Position) -> bool {
        if self.workers.contains_key(position.pair()) {
            return false;
        }
        self.add_engine(PairEngine::with_position(position, Arc::clone(&self.ctx)))
    }

    fn add_engine(&self, engine: PairEngine) -> bool {
        let pair = engine.pair().clone();
        let (handle, join) = spawn_worker(engine, Arc::clone(&self.ctx.exchange));
        self.workers.insert(pair, handle);
        self.joins.lock().push(join);
        true
    }

    #[must_use]
    pub fn context(&self) -> &Arc<StrategyContext> {
        &self.ctx
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    #[must_use]
    pub fn pairs(&self) -> Vec<PairId> {
        let mut pairs: Vec<PairId> = self.workers.iter().map(|e| e.key().clone()).collect();
        pairs.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        pairs
    }

    /// Tick every pair. Workers that have stopped are logged and skipped.
    pub fn tick_all(&self, now: DateTime<Utc>) {
        for entry in self.workers.iter() {
            if let Err(e) = entry.value().tick(now) {
                warn!(pair = %entry.key(), error = %e, "Failed to tick pair");
            }
        }
    }

    fn handle(&self, pair: &PairId) -> Result<PairHandle> {
        self.workers
            .get(pair)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::UnknownPair(pair.clone()))
    }

    /// Ask `pair` to re-offer its held amount.
    pub async fn force_sell(&self, pair: &PairId) -> Result<()> {
        self.handle(pair)?.force_sell().await
    }

    /// Current position of `pair`.
    pub async fn snapshot(&self, pair: &PairId) -> Result<Position> {
        self.handle(pair)?.snapshot().await
    }

    /// Close every mailbox and wait for the workers to exit.
    pub async fn shutdown(&self) {
        self.workers.clear();
        let joins: Vec<_> = std::mem::take(&mut *self.joins.lock());
        info!(workers = joins.len(), "Shutting down pair workers");
        for join in joins {
            if let Err(e) = join.await {
                warn!(error = %e, "Pair worker panicked");
            }
        }
    }
}
