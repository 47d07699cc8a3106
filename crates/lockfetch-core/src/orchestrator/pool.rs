//! Bounded worker pool: a fixed set of threads pulls job indices from a
//! shared queue and sends each result back over a channel. Only the calling
//! thread touches progress and the collected results.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;

use crate::fetcher::FetchFailure;
use crate::lockfile::RequirementSpec;
use crate::result::{FetchOutcome, FetchResult};

use super::progress::ProgressEvent;

/// Run `job` once per requirement on at most `workers` threads.
///
/// Results are returned in completion order; `on_progress` sees each one as
/// it arrives. A panicking job is reported as [`FetchFailure::Aborted`] and
/// never takes its siblings down; every requirement yields exactly one result.
pub(crate) fn run_pool<F, P>(
    requirements: &[RequirementSpec],
    workers: usize,
    job: F,
    mut on_progress: P,
) -> Vec<FetchResult>
where
    F: Fn(&RequirementSpec) -> FetchResult + Sync,
    P: FnMut(ProgressEvent<'_>),
{
    let total = requirements.len();
    if total == 0 {
        return Vec::new();
    }
    let num_workers = workers.max(1).min(total);
    let work: Mutex<VecDeque<usize>> = Mutex::new((0..total).collect());
    let (tx, rx) = mpsc::channel::<(usize, FetchResult)>();

    let mut results = Vec::with_capacity(total);
    let mut reported = vec![false; total];

    thread::scope(|scope| {
        for worker_id in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            let job = &job;
            scope.spawn(move || loop {
                let next = match work.lock() {
                    Ok(mut queue) => queue.pop_front(),
                    Err(poisoned) => poisoned.into_inner().pop_front(),
                };
                let Some(index) = next else {
                    break;
                };
                let spec = &requirements[index];
                let result = panic::catch_unwind(AssertUnwindSafe(|| job(spec)))
                    .unwrap_or_else(|payload| {
                        let message = panic_message(payload.as_ref());
                        tracing::error!(worker_id, name = spec.name(), "fetch job panicked: {}", message);
                        FetchResult::new(
                            spec,
                            FetchOutcome::Failed(FetchFailure::Aborted { message }),
                            Default::default(),
                        )
                    });
                if tx.send((index, result)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        while results.len() < total {
            let Ok((index, result)) = rx.recv() else {
                tracing::error!("worker result channel closed early");
                break;
            };
            reported[index] = true;
            results.push(result);
            if let Some(last) = results.last() {
                on_progress(ProgressEvent {
                    completed: results.len(),
                    total,
                    result: last,
                });
            }
        }
    });

    // Anything a dead worker never reported still gets its one result.
    for (index, spec) in requirements.iter().enumerate() {
        if reported[index] {
            continue;
        }
        let result = FetchResult::new(
            spec,
            FetchOutcome::Failed(FetchFailure::Aborted {
                message: "worker exited before reporting".to_string(),
            }),
            Default::default(),
        );
        results.push(result);
        if let Some(last) = results.last() {
            on_progress(ProgressEvent {
                completed: results.len(),
                total,
                result: last,
            });
        }
    }

    results
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
