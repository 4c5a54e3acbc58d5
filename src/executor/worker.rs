//! Worker loop: dequeue, resolve, append, until the queue is empty or the batch is stopped.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, broadcast};
use tokio_util::sync::CancellationToken;

use crate::lookup::LookupClient;
use crate::types::{CompanyCodeResult, PhoneNumber, ResolutionEvent};

/// State shared by every worker of one batch.
///
/// The queue and the result collection are the only synchronization points; neither
/// lock is held across an await on the lookup.
pub(super) struct BatchContext {
    pub(super) client: LookupClient,
    pub(super) queue: Mutex<VecDeque<PhoneNumber>>,
    pub(super) results: Mutex<Vec<CompanyCodeResult>>,
    pub(super) completed: AtomicUsize,
    pub(super) total: usize,
    pub(super) cancel_token: CancellationToken,
    pub(super) event_tx: Option<broadcast::Sender<ResolutionEvent>>,
}

impl BatchContext {
    async fn next_phone(&self) -> Option<PhoneNumber> {
        self.queue.lock().await.pop_front()
    }

    async fn record(&self, result: CompanyCodeResult) {
        let notify = self.event_tx.as_ref().map(|tx| {
            (
                tx,
                result.phone_number.clone(),
                result.company_code.clone(),
                result.success,
            )
        });

        self.results.lock().await.push(result);
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;

        if let Some((tx, phone_number, company_code, success)) = notify {
            tx.send(ResolutionEvent::LookupCompleted {
                phone_number,
                company_code,
                success,
                completed,
                total: self.total,
            })
            .ok();
        }
    }
}

/// Run one worker until the queue drains or the batch is cancelled.
///
/// A lookup in flight when the token fires is dropped; its phone number gets no result
/// here and is accounted for by the executor.
pub(super) async fn run_worker(worker_id: usize, ctx: Arc<BatchContext>) {
    tracing::debug!(worker = worker_id, "lookup worker started");
    let mut resolved = 0usize;

    loop {
        if ctx.cancel_token.is_cancelled() {
            break;
        }

        let Some(phone_number) = ctx.next_phone().await else {
            break;
        };

        let result = tokio::select! {
            biased;
            _ = ctx.cancel_token.cancelled() => {
                tracing::debug!(worker = worker_id, phone = %phone_number, "lookup abandoned");
                break;
            }
            result = ctx.client.resolve(&phone_number) => result,
        };

        ctx.record(result).await;
        resolved += 1;
    }

    tracing::debug!(worker = worker_id, resolved, "lookup worker stopped");
}
