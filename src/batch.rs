//! Runs independent jobs on a thread pool and gathers their results in input
//! order.

use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};

use threadpool::ThreadPool;

use crate::{error::Error, Result};

/// Runs `job` once per input on `pool`. The returned vector has one entry per
/// input, at the input's position. An input whose worker panicked yields
/// [`Error::WorkerPanicked`].
pub fn run_batch<T, F>(pool: &ThreadPool, inputs: &[PathBuf], job: F) -> Vec<Result<T>>
where
    T: Send + 'static,
    F: Fn(&Path) -> Result<T> + Send + Sync + 'static,
{
    let job = Arc::new(job);
    let (sender, receiver) = mpsc::channel();
    for (index, input) in inputs.iter().enumerate() {
        let job = Arc::clone(&job);
        let sender = sender.clone();
        let input = input.clone();
        pool.execute(move || {
            let result = job(&input);
            // The receiver outlives every worker.
            let _ = sender.send((index, result));
        });
    }
    drop(sender);

    let mut slots: Vec<Option<Result<T>>> = inputs.iter().map(|_| None).collect();
    for (index, result) in receiver.iter() {
        slots[index] = Some(result);
    }
    slots
        .into_iter()
        .zip(inputs)
        .map(|(slot, input)| {
            slot.unwrap_or_else(|| Err(Error::WorkerPanicked(input.display().to_string())))
        })
        .collect()
}
