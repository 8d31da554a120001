// libs/call-cell/src/services/call_log.rs
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot, Semaphore};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info, instrument};

use shared_database::{to_fields, RecordStore};
use shared_models::error::AppError;

use crate::models::{CallLogFields, CallLogRequest};

/// Record-store writes allowed in flight at once. Airtable rate-limits each
/// base to 5 requests per second; queued entries wait for a free permit.
pub const MAX_CONCURRENT_WRITES: usize = 3;

/// Outcome of the call log writes performed by a worker over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub written: usize,
    pub failed: usize,
}

impl DrainReport {
    fn record(&mut self, result: Result<bool, JoinError>) {
        match result {
            Ok(true) => self.written += 1,
            Ok(false) => self.failed += 1,
            Err(e) => {
                error!("Call log task panicked: {}", e);
                self.failed += 1;
            }
        }
    }
}

/// Producer side handed to request handlers.
#[derive(Clone)]
pub struct CallLogQueue {
    sender: mpsc::UnboundedSender<CallLogRequest>,
}

impl CallLogQueue {
    /// Hands the entry to the background worker without waiting for the write.
    pub fn enqueue(&self, entry: CallLogRequest) -> Result<(), AppError> {
        let call_id = entry.call_id.clone();
        self.sender.send(entry).map_err(|_| {
            error!("Call log queue closed, dropping log for call {}", call_id);
            AppError::Internal("Call logging is shutting down".to_string())
        })?;

        debug!("Queued call log for {}", call_id);
        Ok(())
    }
}

/// Background writer for call logs. Failed writes are logged and counted,
/// never reported back to the caller that queued them.
pub struct CallLogWorker {
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<DrainReport>,
}

impl CallLogWorker {
    pub fn spawn(store: Arc<dyn RecordStore>, table: String) -> (CallLogQueue, CallLogWorker) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(run(receiver, shutdown_rx, store, table));

        (CallLogQueue { sender }, CallLogWorker { shutdown_tx, handle })
    }

    /// Stops accepting entries, writes everything already queued, waits for
    /// in-flight writes and reports the totals.
    pub async fn shutdown(self) -> DrainReport {
        let _ = self.shutdown_tx.send(());

        match self.handle.await {
            Ok(report) => report,
            Err(e) => {
                error!("Call log worker terminated abnormally: {}", e);
                DrainReport::default()
            }
        }
    }
}

async fn run(
    mut receiver: mpsc::UnboundedReceiver<CallLogRequest>,
    mut shutdown_rx: oneshot::Receiver<()>,
    store: Arc<dyn RecordStore>,
    table: String,
) -> DrainReport {
    let mut tasks = JoinSet::new();
    let mut report = DrainReport::default();
    let permits = Arc::new(Semaphore::new(MAX_CONCURRENT_WRITES));

    loop {
        tokio::select! {
            entry = receiver.recv() => match entry {
                Some(entry) => {
                    tasks.spawn(write_entry(
                        Arc::clone(&store),
                        Arc::clone(&permits),
                        table.clone(),
                        entry,
                    ));
                }
                None => break,
            },
            Some(result) = tasks.join_next(), if !tasks.is_empty() => report.record(result),
            _ = &mut shutdown_rx => {
                receiver.close();
                while let Some(entry) = receiver.recv().await {
                    tasks.spawn(write_entry(
                        Arc::clone(&store),
                        Arc::clone(&permits),
                        table.clone(),
                        entry,
                    ));
                }
                break;
            }
        }
    }

    if !tasks.is_empty() {
        info!("Draining {} pending call log writes", tasks.len());
    }

    while let Some(result) = tasks.join_next().await {
        report.record(result);
    }

    info!(
        "Call log worker stopped: {} written, {} failed",
        report.written, report.failed
    );
    report
}

#[instrument(skip(store, permits, entry), fields(call_id = %entry.call_id))]
async fn write_entry(
    store: Arc<dyn RecordStore>,
    permits: Arc<Semaphore>,
    table: String,
    entry: CallLogRequest,
) -> bool {
    let call_id = entry.call_id.clone();

    let _permit = match permits.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            error!("Failed to log call {}: {}", call_id, e);
            return false;
        }
    };

    let fields = match to_fields(&CallLogFields::completed(entry, Utc::now().to_rfc3339())) {
        Ok(fields) => fields,
        Err(e) => {
            error!("Failed to log call: {}", e);
            return false;
        }
    };

    match store.create(&table, fields).await {
        Ok(record) => {
            info!("Call logged: {} ({})", call_id, record.id);
            true
        }
        Err(e) => {
            error!("Failed to log call {}: {}", call_id, e);
            false
        }
    }
}
