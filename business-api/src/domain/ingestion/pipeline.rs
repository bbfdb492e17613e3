use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use serde::Deserialize;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, instrument, warn};

use super::CancellationSignal;
use crate::domain::{
    models::{Business, NewBusiness},
    ports::outbound::BusinessRepository,
};

type SharedQueue = Arc<Mutex<mpsc::Receiver<NewBusiness>>>;

#[derive(Debug, Clone, Deserialize)]
pub struct IngestionConfig {
    /// Number of businesses generated per run.
    pub total: usize,
    pub workers: usize,
    pub batch_size: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            total: 10_000,
            workers: 20,
            batch_size: 10,
        }
    }
}

/// What a single worker did before it stopped.
#[derive(Debug, Clone)]
pub struct WorkerOutcome {
    pub worker: String,
    pub businesses: Vec<Business>,
    pub batches: usize,
    pub error: Option<String>,
    pub cancelled: bool,
}

impl WorkerOutcome {
    fn new(worker: &str) -> Self {
        Self {
            worker: worker.to_string(),
            businesses: Vec::new(),
            batches: 0,
            error: None,
            cancelled: false,
        }
    }

    fn lost(worker: &str) -> Self {
        Self {
            error: Some("worker exited without reporting".to_string()),
            ..Self::new(worker)
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none() && !self.cancelled
    }
}

#[derive(Debug, Clone)]
pub struct IngestionReport {
    pub enqueued: usize,
    pub outcomes: Vec<WorkerOutcome>,
    pub elapsed: Duration,
}

impl IngestionReport {
    pub fn persisted(&self) -> usize {
        self.outcomes.iter().map(|o| o.businesses.len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(WorkerOutcome::succeeded) && self.persisted() == self.enqueued
    }

    pub fn failed_workers(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.succeeded())
            .map(|o| o.worker.as_str())
            .collect()
    }

    /// Every persisted business, grouped by worker in the order workers reported.
    pub fn into_businesses(self) -> Vec<Business> {
        self.outcomes
            .into_iter()
            .flat_map(|o| o.businesses)
            .collect()
    }

    pub fn summary(&self) -> String {
        let failed = self.failed_workers();
        format!(
            "persisted {} of {} businesses; {} worker(s) did not finish: {}",
            self.persisted(),
            self.enqueued,
            failed.len(),
            failed.join(", ")
        )
    }
}

/// Fan-out bulk insert: one bounded queue drained by a fixed pool of workers.
///
/// Each worker labels the businesses it takes, inserts them in fixed-size batches, and
/// reports a [`WorkerOutcome`] on the completion channel. [`run`](Self::run) returns
/// only after all workers have reported or exited.
pub struct IngestionPipeline<R> {
    repository: Arc<R>,
    config: IngestionConfig,
}

impl<R: BusinessRepository> IngestionPipeline<R> {
    pub fn new(repository: Arc<R>, config: IngestionConfig) -> Self {
        Self { repository, config }
    }

    #[instrument(
        name = "ingestion",
        skip_all,
        fields(items = businesses.len(), workers = self.config.workers)
    )]
    pub async fn run(
        &self,
        businesses: Vec<NewBusiness>,
        cancel: CancellationSignal,
    ) -> IngestionReport {
        let started = Instant::now();
        let enqueued = businesses.len();
        let workers = self.config.workers.max(1);
        let batch_size = self.config.batch_size.max(1);

        let (queue_tx, queue_rx) = mpsc::channel::<NewBusiness>(enqueued.max(1));
        let queue: SharedQueue = Arc::new(Mutex::new(queue_rx));
        let (done_tx, mut done_rx) = mpsc::channel::<WorkerOutcome>(workers);

        let labels: Vec<String> = (1..=workers).map(|n| format!("worker{n}")).collect();
        for label in &labels {
            let worker = Worker {
                label: label.clone(),
                batch_size,
                repository: Arc::clone(&self.repository),
            };
            tokio::spawn(worker.run(Arc::clone(&queue), done_tx.clone(), cancel.clone()));
        }
        drop(done_tx);
        drop(queue);

        for business in businesses {
            if queue_tx.send(business).await.is_err() {
                warn!("All ingestion workers exited before the queue was drained");
                break;
            }
        }
        drop(queue_tx);

        let mut outcomes = Vec::with_capacity(workers);
        while outcomes.len() < workers {
            match done_rx.recv().await {
                Some(outcome) => outcomes.push(outcome),
                None => break,
            }
        }

        if outcomes.len() < workers {
            let reported: HashSet<String> = outcomes.iter().map(|o| o.worker.clone()).collect();
            for label in labels.iter().filter(|l| !reported.contains(*l)) {
                error!(worker = %label, "Ingestion worker exited without reporting");
                outcomes.push(WorkerOutcome::lost(label));
            }
        }

        let report = IngestionReport {
            enqueued,
            outcomes,
            elapsed: started.elapsed(),
        };
        info!(
            persisted = report.persisted(),
            enqueued,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Ingestion finished"
        );

        report
    }
}

struct Worker<R> {
    label: String,
    batch_size: usize,
    repository: Arc<R>,
}

impl<R: BusinessRepository> Worker<R> {
    async fn run(
        self,
        queue: SharedQueue,
        done: mpsc::Sender<WorkerOutcome>,
        mut cancel: CancellationSignal,
    ) {
        let outcome = self.drain(&queue, &mut cancel).await;
        drop(queue);

        debug!(
            worker = %outcome.worker,
            persisted = outcome.businesses.len(),
            batches = outcome.batches,
            "Worker done"
        );
        if done.send(outcome).await.is_err() {
            warn!(worker = %self.label, "Completion channel closed before worker reported");
        }
    }

    async fn drain(&self, queue: &SharedQueue, cancel: &mut CancellationSignal) -> WorkerOutcome {
        let mut outcome = WorkerOutcome::new(&self.label);
        let mut batch = Vec::with_capacity(self.batch_size);

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    outcome.cancelled = true;
                    return outcome;
                }
                next = next_item(queue) => next,
            };

            let Some(mut business) = next else {
                break;
            };
            business.worker_name = self.label.clone();
            batch.push(business);

            if batch.len() >= self.batch_size
                && !self.flush(&mut batch, &mut outcome, cancel).await
            {
                return outcome;
            }
        }

        if !batch.is_empty() {
            self.flush(&mut batch, &mut outcome, cancel).await;
        }
        outcome
    }

    /// Inserts the pending batch. Returns `false` when the worker should stop.
    async fn flush(
        &self,
        batch: &mut Vec<NewBusiness>,
        outcome: &mut WorkerOutcome,
        cancel: &CancellationSignal,
    ) -> bool {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            return false;
        }

        match self.repository.create_batch(batch, None).await {
            Ok(rows) => {
                outcome.batches += 1;
                outcome.businesses.extend(rows);
                batch.clear();
                true
            }
            Err(e) => {
                error!(worker = %self.label, size = batch.len(), error = %e, "Batch insert failed");
                outcome.error = Some(e.to_string());
                false
            }
        }
    }
}

async fn next_item(queue: &SharedQueue) -> Option<NewBusiness> {
    queue.lock().await.recv().await
}
