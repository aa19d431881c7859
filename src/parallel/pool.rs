//! Rayon thread pool for trial batches.
//!
//! A [WorkerPool] with a fixed thread count builds its dedicated pool once and shares it
//! across every batch it runs. The default uses Rayon's global pool (all CPU cores).

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

#[derive(Debug, Clone, Default)]
pub struct WorkerPool {
    /// `None` runs on the global Rayon pool.
    pool: Option<Arc<ThreadPool>>,
}

impl WorkerPool {
    /// Use all available CPU cores (Rayon default).
    pub fn default_workers() -> Self {
        Self::default()
    }

    /// Build a dedicated pool of `n` threads. `0`, or a pool that cannot be built, means
    /// the global pool.
    pub fn with_workers(n: usize) -> Self {
        if n == 0 {
            return Self::default();
        }
        match ThreadPoolBuilder::new().num_threads(n).build() {
            Ok(pool) => Self {
                pool: Some(Arc::new(pool)),
            },
            Err(err) => {
                tracing::warn!(workers = n, "thread pool unavailable ({err}), using global pool");
                Self::default()
            }
        }
    }

    /// Threads a batch will be spread over.
    pub fn workers(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    pub fn is_dedicated(&self) -> bool {
        self.pool.is_some()
    }

    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}
