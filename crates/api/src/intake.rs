use tokio::sync::mpsc::{self, error::TrySendError, Receiver, Sender};
use tracing::warn;

/// An utterance waiting to be planned
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeTask {
    pub owner_ref: String,
    pub raw_input: String,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum IntakeError {
    #[error("The intake queue is full")]
    QueueFull,
    #[error("The intake workers have stopped")]
    Closed,
}

/// Bounded hand-off between the HTTP layer and the planning workers.
/// Submitting never waits: a full queue is reported to the caller.
#[derive(Clone)]
pub struct IntakeQueue {
    sender: Sender<IntakeTask>,
}

impl IntakeQueue {
    pub fn new(capacity: usize) -> (Self, Receiver<IntakeTask>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    pub fn submit(&self, task: IntakeTask) -> Result<(), IntakeError> {
        self.sender.try_send(task).map_err(|e| match e {
            TrySendError::Full(task) => {
                warn!(
                    owner_ref = %task.owner_ref,
                    "Intake queue is full, rejecting reminder"
                );
                IntakeError::QueueFull
            }
            TrySendError::Closed(_) => IntakeError::Closed,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn task(raw_input: &str) -> IntakeTask {
        IntakeTask {
            owner_ref: "ann@example.com".into(),
            raw_input: raw_input.into(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn rejects_when_full() {
        let (queue, mut receiver) = IntakeQueue::new(2);
        assert!(queue.submit(task("one")).is_ok());
        assert!(queue.submit(task("two")).is_ok());
        assert_eq!(queue.submit(task("three")), Err(IntakeError::QueueFull));

        assert_eq!(receiver.recv().await, Some(task("one")));
        assert!(queue.submit(task("three")).is_ok());
    }

    #[test]
    fn reports_stopped_workers() {
        let (queue, receiver) = IntakeQueue::new(2);
        drop(receiver);
        assert_eq!(queue.submit(task("one")), Err(IntakeError::Closed));
    }
}
