//! Non-blocking relay dispatch with logging-only failure handling.

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{info, warn};

use super::payload::RelayEvent;

/// Delivery failures. Contained here; callers never see them.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("relay endpoint rejected event: {0}")]
    Rejected(String),

    #[error("relay transport failure: {0}")]
    Transport(String),
}

/// Transport seam. The host application supplies the actual delivery (HTTP,
/// queue, whatever); the dispatcher only cares that it is synchronous and
/// fallible.
pub trait RelaySink: Send {
    fn deliver(&self, event: &RelayEvent) -> Result<(), RelayError>;
}

/// Default sink: records the event in the log and drops it.
pub struct LogSink;

impl RelaySink for LogSink {
    fn deliver(&self, event: &RelayEvent) -> Result<(), RelayError> {
        match event.to_json() {
            Ok(body) => info!(kind = event.kind(), %body, "relay event"),
            Err(err) => warn!(kind = event.kind(), %err, "relay event not serializable"),
        }
        Ok(())
    }
}

/// One-way dispatch queue drained by a worker thread.
///
/// `dispatch` never blocks on delivery and never reports failure to the
/// caller: a failed delivery is logged and the event is gone. No retries.
pub struct RelayDispatcher {
    tx: Option<Sender<RelayEvent>>,
    worker: Option<JoinHandle<()>>,
}

impl RelayDispatcher {
    pub fn new(sink: Box<dyn RelaySink>) -> Self {
        let (tx, rx) = mpsc::channel::<RelayEvent>();
        let worker = thread::spawn(move || {
            for event in rx {
                if let Err(err) = sink.deliver(&event) {
                    warn!(kind = event.kind(), %err, "relay delivery failed");
                }
            }
        });
        Self {
            tx: Some(tx),
            worker: Some(worker),
        }
    }

    /// Queue an event for delivery.
    pub fn dispatch(&self, event: RelayEvent) {
        if let Some(tx) = &self.tx {
            if tx.send(event).is_err() {
                warn!("relay worker is gone; event dropped");
            }
        }
    }
}

impl Default for RelayDispatcher {
    fn default() -> Self {
        Self::new(Box::new(LogSink))
    }
}

impl Drop for RelayDispatcher {
    /// Close the queue and let the worker drain what was already accepted.
    fn drop(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::WorkflowTrigger;
    use std::sync::{Arc, Mutex};

    struct RecordingSink {
        delivered: Arc<Mutex<Vec<String>>>,
    }

    impl RelaySink for RecordingSink {
        fn deliver(&self, event: &RelayEvent) -> Result<(), RelayError> {
            self.delivered.lock().unwrap().push(event.kind().to_string());
            Ok(())
        }
    }

    struct FailingSink;

    impl RelaySink for FailingSink {
        fn deliver(&self, _event: &RelayEvent) -> Result<(), RelayError> {
            Err(RelayError::Transport("connection refused".into()))
        }
    }

    fn workflow_event(name: &str) -> RelayEvent {
        RelayEvent::Workflow(WorkflowTrigger::new(name))
    }

    #[test]
    fn test_events_reach_the_sink() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let dispatcher = RelayDispatcher::new(Box::new(RecordingSink {
            delivered: delivered.clone(),
        }));

        dispatcher.dispatch(workflow_event("first"));
        dispatcher.dispatch(workflow_event("second"));
        drop(dispatcher); // joins the worker, draining the queue

        assert_eq!(delivered.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_failures_are_swallowed() {
        let dispatcher = RelayDispatcher::new(Box::new(FailingSink));
        dispatcher.dispatch(workflow_event("doomed"));
        // Nothing to assert beyond "no panic, no error surfaced": dropping
        // joins the worker after it has processed the failing delivery.
        drop(dispatcher);
    }

    #[test]
    fn test_log_sink_accepts_events() {
        assert!(LogSink.deliver(&workflow_event("logged")).is_ok());
    }
}
