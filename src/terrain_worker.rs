//! Parallel terrain generation worker pool.
//!
//! Each request owns its seed and builds its own grid, so workers never share
//! a vertex buffer. Generation runs on a dedicated rayon pool sized at
//! construction; results go back to the caller over a bounded crossbeam
//! channel.

use crossbeam::channel::{bounded, Receiver, Sender};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;

use crate::error::TerrainResult;
use crate::terrain::{generate_seeded, TerrainConfig, TerrainMesh};

/// Fraction of detected CPUs to use for terrain worker threads (numerator).
const THREAD_CPU_NUMERATOR: usize = 3;
/// Fraction of detected CPUs to use for terrain worker threads (denominator).
const THREAD_CPU_DENOMINATOR: usize = 4;
/// Minimum number of terrain worker threads.
const MIN_WORKER_THREADS: usize = 2;
/// Minimum batch size for processing terrain requests.
const MIN_BATCH_SIZE: usize = 16;
/// Default channel capacity for terrain request/result channels.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Request sent from the caller to workers
pub struct TerrainRequest {
    /// Caller-chosen tag echoed back on the result
    pub id: u64,
    pub seed: u64,
    pub config: Arc<TerrainConfig>,
}

pub struct TerrainJobResult {
    pub id: u64,
    pub seed: u64,
    pub mesh: TerrainResult<TerrainMesh>,
}

/// Worker pool for parallel terrain generation
pub struct TerrainWorkerPool {
    workers: ThreadPool,
    request_tx: Sender<TerrainRequest>,
    request_rx: Receiver<TerrainRequest>,
    result_tx: Sender<TerrainJobResult>,
    result_rx: Receiver<TerrainJobResult>,
}

fn default_thread_count() -> usize {
    ((num_cpus::get() * THREAD_CPU_NUMERATOR) / THREAD_CPU_DENOMINATOR).max(MIN_WORKER_THREADS)
}

impl TerrainWorkerPool {
    /// `num_threads == 0` picks 3/4 of the detected CPUs (at least 2).
    pub fn new(num_threads: usize, channel_capacity: usize) -> TerrainResult<Self> {
        let threads = match num_threads {
            0 => default_thread_count(),
            n => n,
        };
        let workers = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("terrain-worker-{i}"))
            .build()?;

        let (request_tx, request_rx) = bounded(channel_capacity);
        let (result_tx, result_rx) = bounded(channel_capacity);

        Ok(Self {
            workers,
            request_tx,
            request_rx,
            result_tx,
            result_rx,
        })
    }

    pub fn with_default_threads() -> TerrainResult<Self> {
        Self::new(0, DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn request_sender(&self) -> Sender<TerrainRequest> {
        self.request_tx.clone()
    }

    pub fn result_receiver(&self) -> Receiver<TerrainJobResult> {
        self.result_rx.clone()
    }

    /// Generate up to one batch of queued requests on the worker threads and
    /// publish the results.
    ///
    /// Results the result channel has no room for are handed back here in
    /// request order, so nothing finished is ever discarded.
    #[must_use = "results that did not fit in the result channel are only returned here"]
    pub fn process_requests(&self) -> Vec<TerrainJobResult> {
        let batch_size = self.thread_count().max(MIN_BATCH_SIZE);
        let batch: Vec<TerrainRequest> = self.request_rx.try_iter().take(batch_size).collect();
        if batch.is_empty() {
            return Vec::new();
        }

        let results: Vec<TerrainJobResult> = self
            .workers
            .install(|| batch.par_iter().map(generate_for_request).collect());

        let mut undelivered = Vec::new();
        for result in results {
            if let Err(err) = self.result_tx.try_send(result) {
                undelivered.push(err.into_inner());
            }
        }
        undelivered
    }

    /// Same as [`generate_batch`], but on this pool's threads.
    pub fn generate_batch(
        &self,
        config: &TerrainConfig,
        seeds: &[u64],
    ) -> Vec<TerrainResult<TerrainMesh>> {
        self.workers.install(|| generate_batch(config, seeds))
    }

    pub fn thread_count(&self) -> usize {
        self.workers.current_num_threads()
    }

    pub fn shutdown(&mut self) {
        while self.request_rx.try_recv().is_ok() {}
        while self.result_rx.try_recv().is_ok() {}
    }
}

fn generate_for_request(request: &TerrainRequest) -> TerrainJobResult {
    TerrainJobResult {
        id: request.id,
        seed: request.seed,
        mesh: generate_seeded(&request.config, request.seed),
    }
}

/// Generate one terrain per seed in parallel on the current rayon pool.
/// Output order matches `seeds`.
pub fn generate_batch(
    config: &TerrainConfig,
    seeds: &[u64],
) -> Vec<TerrainResult<TerrainMesh>> {
    seeds
        .par_iter()
        .map(|&seed| generate_seeded(config, seed))
        .collect()
}
