// src/notifications/queue.rs
//
// Fire-and-forget delivery. Callers enqueue synchronously and return; a
// worker task on the tokio runtime hands every message to the sink on its
// own task, so one slow or failing recipient never holds up the others.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinError, JoinHandle, JoinSet};

use crate::error::{AppError, AppResult};
use crate::notifications::sink::{Notification, NotificationSink};

/// Failures kept in detail per report; later ones are only counted
pub const MAX_RECORDED_FAILURES: usize = 100;

/// Outcome of everything the worker processed before shutdown
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    /// Every failed delivery, including those beyond `failed`
    pub failed_count: usize,
    /// The first `MAX_RECORDED_FAILURES` failures
    pub failed: Vec<FailedDelivery>,
}

impl DeliveryReport {
    fn push_failure(&mut self, failure: FailedDelivery) {
        self.failed_count += 1;
        if self.failed.len() < MAX_RECORDED_FAILURES {
            self.failed.push(failure);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDelivery {
    pub recipient: String,
    pub subject: String,
    pub error: String,
}

pub struct NotificationQueue {
    sender: Mutex<Option<UnboundedSender<Notification>>>,
    worker: Mutex<Option<JoinHandle<DeliveryReport>>>,
}

impl NotificationQueue {
    /// Spawn the delivery worker on `runtime`
    pub fn start(sink: Arc<dyn NotificationSink>, runtime: &Handle) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = runtime.spawn(run_worker(sink, receiver));

        Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Queue a message for delivery; never waits on the sink
    pub fn enqueue(&self, notification: Notification) -> AppResult<()> {
        let guard = lock(&self.sender);
        let sender = guard
            .as_ref()
            .ok_or_else(|| AppError::Notification("notification queue is shut down".to_string()))?;

        sender.send(notification).map_err(|rejected| {
            AppError::Notification(format!(
                "notification worker stopped; dropped message to {}",
                rejected.0.recipient
            ))
        })
    }

    /// Stop accepting messages and wait for every queued one to finish
    ///
    /// Calling it again returns an empty report.
    pub async fn shutdown(&self) -> DeliveryReport {
        drop(lock(&self.sender).take());

        let worker = lock(&self.worker).take();
        let Some(worker) = worker else {
            return DeliveryReport::default();
        };

        match worker.await {
            Ok(report) => {
                log::info!(
                    "Notification queue drained: {} delivered, {} failed",
                    report.delivered,
                    report.failed_count
                );
                report
            }
            Err(e) => {
                log::error!("Notification worker ended abnormally: {}", e);
                DeliveryReport::default()
            }
        }
    }
}

type DeliveryResult = Result<(Notification, AppResult<()>), JoinError>;

async fn run_worker(
    sink: Arc<dyn NotificationSink>,
    mut receiver: UnboundedReceiver<Notification>,
) -> DeliveryReport {
    let mut in_flight = JoinSet::new();
    let mut report = DeliveryReport::default();

    while let Some(notification) = receiver.recv().await {
        let sink = Arc::clone(&sink);
        in_flight.spawn(async move {
            let result = sink
                .send(&notification.recipient, &notification.subject, &notification.body)
                .await;
            (notification, result)
        });

        while let Some(done) = in_flight.try_join_next() {
            record(&mut report, done);
        }
    }

    while let Some(done) = in_flight.join_next().await {
        record(&mut report, done);
    }

    report
}

fn record(report: &mut DeliveryReport, done: DeliveryResult) {
    match done {
        Ok((_, Ok(()))) => report.delivered += 1,
        Ok((notification, Err(e))) => {
            log::warn!(
                "Failed to notify {} ({:?}): {}",
                notification.recipient,
                notification.subject,
                e
            );
            report.push_failure(FailedDelivery {
                recipient: notification.recipient,
                subject: notification.subject,
                error: e.to_string(),
            });
        }
        Err(e) => {
            log::error!("Notification task aborted: {}", e);
            report.push_failure(FailedDelivery {
                recipient: "unknown".to_string(),
                subject: String::new(),
                error: e.to_string(),
            });
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
