//! Runs all jobs of a run, independent files in parallel.

use rayon::prelude::*;

use crate::pipeline::job_runner::{JobConfig, run_job};
use crate::report::FileReport;

/// Run every job, collecting per-job results in input order.
/// One job failure does NOT prevent other jobs from running.
///
/// `workers` > 0 pins the rayon pool size; 0 uses the rayon default.
pub fn run_all_jobs(jobs: &[JobConfig], workers: usize) -> Vec<crate::error::Result<FileReport>> {
    if workers > 0 {
        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => return pool.install(|| jobs.par_iter().map(run_job).collect()),
            Err(e) => {
                tracing::warn!("worker pool setup failed ({e}); using default pool");
            }
        }
    }
    jobs.par_iter().map(run_job).collect()
}
