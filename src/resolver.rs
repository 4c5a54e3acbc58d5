//! Resolver facade: the entry point reporting handlers use.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::budget::estimate_batch_duration;
use crate::config::ResolverConfig;
use crate::error::{Error, Result};
use crate::executor::BatchExecutor;
use crate::lookup::{CompanyLookup, HttpCompanyLookup, LookupClient};
use crate::types::{BatchRequest, BatchResult, CompanyCodeResult, PhoneNumber, ResolutionEvent};

/// Resolves phone numbers to company codes under the configured limits.
///
/// Holds no per-batch state: every call builds its own queue and result collection, so
/// one resolver can serve concurrent requests.
#[derive(Clone, Debug)]
pub struct CompanyCodeResolver {
    config: Arc<ResolverConfig>,
    client: LookupClient,
    executor: BatchExecutor,
    event_tx: broadcast::Sender<ResolutionEvent>,
}

impl CompanyCodeResolver {
    /// Create a resolver that calls the configured HTTP lookup service
    pub fn new(config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        let lookup = HttpCompanyLookup::new(&config.lookup)?;
        Self::with_lookup(config, Arc::new(lookup))
    }

    /// Create a resolver over any [`CompanyLookup`] implementation
    pub fn with_lookup(config: ResolverConfig, lookup: Arc<dyn CompanyLookup>) -> Result<Self> {
        config.validate()?;

        let (event_tx, _rx) = broadcast::channel(config.event_channel_capacity);
        let client = LookupClient::new(lookup);
        let executor = BatchExecutor::new(client.clone()).with_events(event_tx.clone());

        Ok(Self {
            config: Arc::new(config),
            client,
            executor,
            event_tx,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Subscribe to progress events of every batch run by this resolver
    pub fn subscribe(&self) -> broadcast::Receiver<ResolutionEvent> {
        self.event_tx.subscribe()
    }

    /// Build a batch from raw phone strings
    ///
    /// Empty and whitespace-only values are dropped, duplicates collapse. `None` selects
    /// the configured default concurrency; requests above `max_concurrency` are clamped.
    pub fn prepare_batch<I, S>(
        &self,
        phone_numbers: I,
        concurrency: Option<usize>,
    ) -> Result<BatchRequest>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let concurrency = concurrency.unwrap_or(self.config.default_concurrency);
        if concurrency == 0 {
            return Err(Error::InvalidConcurrency(concurrency));
        }

        Ok(BatchRequest::new(
            phone_numbers,
            self.capped_concurrency(concurrency),
        ))
    }

    /// Concurrency actually used for `requested`: never above `max_concurrency`
    fn capped_concurrency(&self, requested: usize) -> usize {
        let max = self.config.max_concurrency;
        if requested > max {
            tracing::debug!(requested, max, "clamping requested concurrency");
        }
        requested.min(max)
    }

    /// `request` as it will run, with its concurrency capped
    fn capped<'a>(&self, request: &'a BatchRequest) -> Cow<'a, BatchRequest> {
        let concurrency = self.capped_concurrency(request.concurrency);
        if concurrency == request.concurrency {
            return Cow::Borrowed(request);
        }
        Cow::Owned(BatchRequest {
            phone_numbers: request.phone_numbers.clone(),
            concurrency,
        })
    }

    /// Estimate how long a batch takes and fail if it cannot fit the batch deadline
    ///
    /// Returns the estimate when it fits.
    pub fn check_budget(&self, request: &BatchRequest) -> Result<Duration> {
        let concurrency = self.capped_concurrency(request.concurrency);
        let estimated = estimate_batch_duration(
            request.len(),
            concurrency,
            self.config.expected_lookup_latency,
        );
        let budget = self.config.batch_deadline;

        if estimated > budget {
            tracing::warn!(
                phones = request.len(),
                concurrency,
                estimated_ms = estimated.as_millis() as u64,
                budget_ms = budget.as_millis() as u64,
                "company code batch predicted to exceed its deadline"
            );
            return Err(Error::BudgetExceeded { estimated, budget });
        }
        Ok(estimated)
    }

    /// Resolve a single phone number
    pub async fn resolve_one(&self, phone_number: &PhoneNumber) -> CompanyCodeResult {
        self.client.resolve(phone_number).await
    }

    /// Resolve a batch under the configured deadline
    pub async fn resolve_batch(&self, request: &BatchRequest) -> BatchResult {
        self.resolve_batch_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Resolve a batch under the configured deadline, stopping early if `cancel` fires
    ///
    /// A request built outside [`prepare_batch`](Self::prepare_batch) still runs with at
    /// most `max_concurrency` lookups in flight.
    pub async fn resolve_batch_with_cancel(
        &self,
        request: &BatchRequest,
        cancel: CancellationToken,
    ) -> BatchResult {
        let request = self.capped(request);
        self.executor
            .execute_batch_with_deadline(&request, self.config.batch_deadline, cancel)
            .await
    }

    /// Run the budget pre-check, then the batch
    pub async fn resolve_within_budget(&self, request: &BatchRequest) -> Result<BatchResult> {
        self.check_budget(request)?;
        Ok(self.resolve_batch(request).await)
    }
}
