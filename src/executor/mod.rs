//! Bounded batch executor: resolves many phone numbers with at most N lookups in flight.
//!
//! A batch runs `min(concurrency, phones)` worker tasks that pull from one shared queue
//! (see [`worker`]). The executor races the workers against an optional deadline and the
//! caller's [`CancellationToken`]. When either fires first, in-flight lookups are dropped,
//! completed results are kept, and every phone number left without a result is recorded
//! as `ERROR` with `success = false` so the batch still has exactly one result per input.

mod worker;


use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, broadcast};
use tokio_util::sync::CancellationToken;

use crate::lookup::LookupClient;
use crate::types::{BatchRequest, BatchResult, CompanyCodeResult, PhoneNumber, ResolutionEvent};

use worker::{BatchContext, run_worker};

/// Why the batch stopped waiting on its workers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Completed,
    DeadlineExpired,
    Cancelled,
}

/// Drives [`LookupClient`] calls for a whole batch under a concurrency cap.
#[derive(Debug, Clone)]
pub struct BatchExecutor {
    client: LookupClient,
    event_tx: Option<broadcast::Sender<ResolutionEvent>>,
}

impl BatchExecutor {
    /// Create an executor that does not emit progress events
    pub fn new(client: LookupClient) -> Self {
        Self {
            client,
            event_tx: None,
        }
    }

    /// Emit [`ResolutionEvent`]s on `event_tx` while batches run
    pub fn with_events(mut self, event_tx: broadcast::Sender<ResolutionEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Resolve every phone number, waiting for all lookups to finish.
    ///
    /// Returns one result per phone number in no particular order. An empty set returns
    /// immediately without calling the lookup service.
    pub async fn execute_batch(
        &self,
        phone_numbers: &BTreeSet<PhoneNumber>,
        concurrency: usize,
    ) -> Vec<CompanyCodeResult> {
        self.run(phone_numbers, concurrency, None, CancellationToken::new())
            .await
            .results
    }

    /// Resolve a batch, giving up on unfinished lookups after `deadline` or when
    /// `cancel` fires.
    pub async fn execute_batch_with_deadline(
        &self,
        request: &BatchRequest,
        deadline: Duration,
        cancel: CancellationToken,
    ) -> BatchResult {
        self.run(
            &request.phone_numbers,
            request.concurrency,
            Some(deadline),
            cancel,
        )
        .await
    }

    async fn run(
        &self,
        phone_numbers: &BTreeSet<PhoneNumber>,
        concurrency: usize,
        deadline: Option<Duration>,
        cancel: CancellationToken,
    ) -> BatchResult {
        let started = Instant::now();
        let total = phone_numbers.len();

        if total == 0 {
            tracing::debug!("empty batch, no lookups issued");
            let result = BatchResult {
                elapsed: started.elapsed(),
                ..BatchResult::default()
            };
            self.emit_finished(&result);
            return result;
        }

        if concurrency == 0 {
            tracing::warn!("concurrency 0 requested, running with a single worker");
        }
        let workers = concurrency.clamp(1, total);

        tracing::info!(
            total,
            concurrency = workers,
            deadline_ms = deadline.map(|d| d.as_millis() as u64),
            "resolving company codes"
        );
        if let Some(tx) = &self.event_tx {
            tx.send(ResolutionEvent::BatchStarted {
                total,
                concurrency: workers,
            })
            .ok();
        }

        let cancel_token = cancel.child_token();
        let ctx = Arc::new(BatchContext {
            client: self.client.clone(),
            queue: Mutex::new(phone_numbers.iter().cloned().collect::<VecDeque<_>>()),
            results: Mutex::new(Vec::with_capacity(total)),
            completed: AtomicUsize::new(0),
            total,
            cancel_token: cancel_token.clone(),
            event_tx: self.event_tx.clone(),
        });

        let handles: Vec<_> = (0..workers)
            .map(|worker_id| tokio::spawn(run_worker(worker_id, Arc::clone(&ctx))))
            .collect();

        let joined = futures::future::join_all(handles);
        tokio::pin!(joined);
        let deadline_sleep = sleep_for(deadline);
        tokio::pin!(deadline_sleep);

        let stop = tokio::select! {
            outcomes = &mut joined => {
                log_worker_failures(outcomes);
                StopReason::Completed
            }
            _ = &mut deadline_sleep => StopReason::DeadlineExpired,
            _ = cancel.cancelled() => StopReason::Cancelled,
        };

        if stop != StopReason::Completed {
            // Workers leave at their next await point; wait so no lookup outlives the batch
            cancel_token.cancel();
            log_worker_failures(joined.await);
        }

        let mut results = std::mem::take(&mut *ctx.results.lock().await);
        let abandoned = record_abandoned(phone_numbers, &mut results);

        let result = BatchResult {
            results,
            timed_out: stop == StopReason::DeadlineExpired,
            cancelled: stop == StopReason::Cancelled,
            abandoned,
            elapsed: started.elapsed(),
        };

        let summary = result.summary();
        if stop != StopReason::Completed {
            tracing::warn!(
                reason = ?stop,
                abandoned,
                completed = total - abandoned,
                total,
                "company code batch stopped before all lookups finished"
            );
        }
        tracing::info!(
            total = summary.total,
            successful = summary.successful,
            errors = summary.errors,
            unknown = summary.unknown,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "company code batch finished"
        );

        self.emit_finished(&result);
        result
    }

    fn emit_finished(&self, result: &BatchResult) {
        if let Some(tx) = &self.event_tx {
            tx.send(ResolutionEvent::BatchFinished {
                summary: result.summary(),
                elapsed_ms: result.elapsed.as_millis() as u64,
                timed_out: result.timed_out,
                cancelled: result.cancelled,
                abandoned: result.abandoned,
            })
            .ok();
        }
    }
}

async fn sleep_for(deadline: Option<Duration>) {
    match deadline {
        Some(deadline) => tokio::time::sleep(deadline).await,
        None => std::future::pending().await,
    }
}

fn log_worker_failures(outcomes: Vec<std::result::Result<(), tokio::task::JoinError>>) {
    for outcome in outcomes {
        if let Err(e) = outcome {
            tracing::error!(error = %e, "lookup worker panicked");
        }
    }
}

/// Give every phone number without a result a synthetic `ERROR` result.
///
/// Returns how many were added.
fn record_abandoned(
    phone_numbers: &BTreeSet<PhoneNumber>,
    results: &mut Vec<CompanyCodeResult>,
) -> usize {
    let missing: Vec<PhoneNumber> = {
        let seen: HashSet<&str> = results.iter().map(|r| r.phone_number.as_str()).collect();
        phone_numbers
            .iter()
            .filter(|p| !seen.contains(p.as_str()))
            .cloned()
            .collect()
    };

    let abandoned = missing.len();
    results.extend(missing.into_iter().map(CompanyCodeResult::failed));
    abandoned
}
