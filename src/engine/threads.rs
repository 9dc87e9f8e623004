//! Persistent search workers.
//!
//! Each worker owns a job channel and lives until the pool shrinks. The
//! first worker runs every search; it streams `info` lines and the final
//! result back over a per-search reply channel.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::board::search::{search, SearchConfig, SearchOutcome};
use crate::board::{Board, Psqt};
use crate::sync::StopFlag;
use crate::tt::TranspositionTable;

use super::EngineError;

/// Search thread stack size (32 MB)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Messages sent from a worker while it handles a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    Info(String),
    Finished(SearchOutcome),
    Failed(String),
}

/// Everything a worker needs to run one search.
pub struct SearchJob {
    pub board: Board,
    pub config: SearchConfig,
    pub tt: Arc<TranspositionTable>,
    pub psqt: Arc<Psqt>,
    pub stop: StopFlag,
}

enum Job {
    Search(SearchJob, Sender<WorkerMessage>),
}

struct Worker {
    jobs: Sender<Job>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
pub struct ThreadPool {
    workers: Vec<Worker>,
}

impl ThreadPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Resize to exactly `count` workers. Existing workers are joined first,
    /// so `set(0)` leaves no thread behind.
    pub fn set(&mut self, count: usize) -> Result<(), EngineError> {
        self.shutdown();
        for id in 0..count {
            let (jobs, inbox) = unbounded();
            let handle = thread::Builder::new()
                .name(format!("search-{id}"))
                .stack_size(SEARCH_STACK_SIZE)
                .spawn(move || worker_loop(&inbox))
                .map_err(|e| EngineError::ThreadSpawn(e.to_string()))?;
            self.workers.push(Worker { jobs, handle });
        }
        log::debug!("thread pool resized to {count}");
        Ok(())
    }

    fn shutdown(&mut self) {
        for worker in self.workers.drain(..) {
            // Closing the channel ends the worker loop
            drop(worker.jobs);
            if worker.handle.join().is_err() {
                log::error!("search worker panicked during shutdown");
            }
        }
    }

    /// Hand a search to the main worker and return the channel its messages
    /// arrive on. The channel closes once the worker is done with the job.
    pub fn start(&self, job: SearchJob) -> Result<Receiver<WorkerMessage>, EngineError> {
        let main = self.workers.first().ok_or(EngineError::NoThreads)?;
        let (reply, messages) = unbounded();
        main.jobs
            .send(Job::Search(job, reply))
            .map_err(|_| EngineError::WorkerLost)?;
        Ok(messages)
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(inbox: &Receiver<Job>) {
    for job in inbox {
        match job {
            Job::Search(job, reply) => run_search(job, &reply),
        }
    }
}

fn run_search(job: SearchJob, reply: &Sender<WorkerMessage>) {
    let SearchJob {
        mut board,
        config,
        tt,
        psqt,
        stop,
    } = job;

    let info_reply = reply.clone();
    let config = config.with_info_callback(Arc::new(move |info| {
        let _ = info_reply.send(WorkerMessage::Info(info.to_uci_line()));
    }));

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        search(&mut board, &tt, &psqt, &config, &stop)
    }));
    let message = match result {
        Ok(outcome) => WorkerMessage::Finished(outcome),
        Err(payload) => WorkerMessage::Failed(panic_message(payload.as_ref())),
    };
    // The requester may have given up; nothing else to do then
    let _ = reply.send(message);
}

/// Text carried by a panic payload, if it is a string.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "search worker panicked".to_string())
}
