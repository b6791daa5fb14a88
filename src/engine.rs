//! Background search worker.
//!
//! The engine owns a [`Search`] on a dedicated thread. Each request carries
//! its own reply channel, so a caller can keep serving input while the
//! worker thinks and pick the result up later.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use tracing::{debug, warn};

use crate::error::{ChessError, ChessResult};
use crate::position::Position;
use crate::search::{Search, SearchConfig, SearchOutcome};

enum Request {
    Search {
        position: Position,
        reply: Sender<SearchOutcome>,
    },
    SetDepth(u32),
    Shutdown,
}

/// Handle to the search worker thread. Dropping it stops the worker.
pub struct EngineHandle {
    requests: Sender<Request>,
    worker: Option<JoinHandle<()>>,
}

/// A search in flight on the worker.
pub struct PendingSearch {
    reply: Receiver<SearchOutcome>,
}

impl PendingSearch {
    /// Returns the outcome if the worker has finished, without blocking.
    pub fn try_outcome(&self) -> ChessResult<Option<SearchOutcome>> {
        match self.reply.try_recv() {
            Ok(outcome) => Ok(Some(outcome)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(worker_gone()),
        }
    }

    pub fn wait_timeout(&self, timeout: Duration) -> ChessResult<Option<SearchOutcome>> {
        match self.reply.recv_timeout(timeout) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(worker_gone()),
        }
    }

    pub fn wait(self) -> ChessResult<SearchOutcome> {
        self.reply.recv().map_err(|_| worker_gone())
    }
}

fn worker_gone() -> ChessError {
    ChessError::Worker("search worker stopped before replying".to_string())
}

impl EngineHandle {
    pub fn spawn(config: SearchConfig) -> ChessResult<EngineHandle> {
        let (requests, inbox) = unbounded();
        let worker = thread::Builder::new()
            .name("search-worker".to_string())
            .spawn(move || run_worker(config, inbox))
            .map_err(|e| ChessError::Worker(e.to_string()))?;
        Ok(EngineHandle { requests, worker: Some(worker) })
    }

    /// Queues a search of `position` and returns immediately.
    pub fn request_move(&self, position: Position) -> ChessResult<PendingSearch> {
        let (reply, receiver) = bounded(1);
        self.requests
            .send(Request::Search { position, reply })
            .map_err(|_| ChessError::Worker("search worker is not running".to_string()))?;
        Ok(PendingSearch { reply: receiver })
    }

    /// Searches `position` and blocks until the worker answers.
    pub fn search(&self, position: Position) -> ChessResult<SearchOutcome> {
        self.request_move(position)?.wait()
    }

    /// Changes the depth used by later searches.
    pub fn set_depth(&self, depth: u32) -> ChessResult<()> {
        self.requests
            .send(Request::SetDepth(depth))
            .map_err(|_| ChessError::Worker("search worker is not running".to_string()))
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        // the worker may already be gone; nothing to report then
        let _ = self.requests.send(Request::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("search worker panicked");
            }
        }
    }
}

fn run_worker(config: SearchConfig, inbox: Receiver<Request>) {
    let mut search = Search::new(config);
    debug!(depth = config.depth(), "search worker started");
    for request in inbox.iter() {
        match request {
            Request::Search { position, reply } => {
                let outcome = search.find_best_move(&position);
                if reply.send(outcome).is_err() {
                    debug!("search result dropped by requester");
                }
            }
            Request::SetDepth(depth) => {
                search.set_depth(depth);
                debug!(depth = search.config().depth(), "search depth changed");
            }
            Request::Shutdown => break,
        }
    }
    debug!("search worker stopped");
}
