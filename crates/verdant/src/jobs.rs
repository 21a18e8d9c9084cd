//! # Generation Jobs
//!
//! Terrain generation is fire-and-forget: a job owns its chunk outright and
//! publishes it on the completion channel when done. Nothing is cancelled
//! and nothing is awaited.
//!
//! [`RayonSpawner`] is the production pool. [`InlineSpawner`] and
//! [`DeferredSpawner`] make scheduling deterministic for tests and tools.

use std::collections::VecDeque;

use parking_lot::Mutex;

/// A unit of background work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs somewhere, at some point.
pub trait JobSpawner: Send + Sync {
    /// Hands `job` off. Must not block on its completion.
    fn spawn(&self, job: Job);
}

/// Spawns onto rayon's global thread pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct RayonSpawner;

impl JobSpawner for RayonSpawner {
    fn spawn(&self, job: Job) {
        rayon::spawn(job);
    }
}

/// Runs every job immediately on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineSpawner;

impl JobSpawner for InlineSpawner {
    fn spawn(&self, job: Job) {
        job();
    }
}

/// Holds jobs until they are run explicitly.
#[derive(Default)]
pub struct DeferredSpawner {
    queue: Mutex<VecDeque<Job>>,
}

impl DeferredSpawner {
    /// Creates an empty spawner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Runs the oldest job. Returns `false` if there was none.
    pub fn run_one(&self) -> bool {
        // Release the lock before running; a job may spawn more jobs
        let job = self.queue.lock().pop_front();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Runs jobs until the queue is empty. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while self.run_one() {
            ran += 1;
        }
        ran
    }
}

impl JobSpawner for DeferredSpawner {
    fn spawn(&self, job: Job) {
        self.queue.lock().push_back(job);
    }
}
