//! One-shot task execution off the consumer thread.
//!
//! A [`TaskRunner`] is built for a single triggered action and consumed by
//! `submit`. The operation runs on the runtime's worker threads; whatever it
//! returns, including a panic, becomes exactly one completion message.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use tdnet_types::{CompletionMessage, FetchError, Payload, TaskId, TaskPhase, Target};

use crate::delivery::DeliverySender;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId::new(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug)]
pub struct TaskRunner {
    id: TaskId,
    target: Target,
    runtime: Handle,
    sender: DeliverySender,
}

impl TaskRunner {
    #[must_use]
    pub fn new(target: Target, runtime: Handle, sender: DeliverySender) -> Self {
        Self {
            id: next_task_id(),
            target,
            runtime,
            sender,
        }
    }

    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Run `operation(inputs)` as an async worker task.
    ///
    /// Returns `None` without starting anything when `inputs` is empty.
    pub fn submit<I, F, Fut>(self, inputs: Vec<I>, operation: F) -> Option<TaskId>
    where
        I: Send + 'static,
        F: FnOnce(Vec<I>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Payload, FetchError>> + Send + 'static,
    {
        if inputs.is_empty() {
            tracing::debug!(task = %self.id, target = %self.target, "no inputs; task not started");
            return None;
        }

        let work = self.runtime.spawn(async move { operation(inputs).await });
        Some(self.settle(work))
    }

    /// Run a synchronous, blocking `operation(inputs)` on the runtime's blocking pool.
    ///
    /// Returns `None` without starting anything when `inputs` is empty.
    pub fn submit_blocking<I, F>(self, inputs: Vec<I>, operation: F) -> Option<TaskId>
    where
        I: Send + 'static,
        F: FnOnce(Vec<I>) -> Result<Payload, FetchError> + Send + 'static,
    {
        if inputs.is_empty() {
            tracing::debug!(task = %self.id, target = %self.target, "no inputs; task not started");
            return None;
        }

        let work = self.runtime.spawn_blocking(move || operation(inputs));
        Some(self.settle(work))
    }

    fn settle(self, work: JoinHandle<Result<Payload, FetchError>>) -> TaskId {
        let Self {
            id,
            target,
            runtime,
            sender,
        } = self;
        tracing::debug!(task = %id, %target, "task started");

        runtime.spawn(async move {
            let outcome = match work.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(task = %id, %target, "worker aborted: {e}");
                    Err(FetchError::WorkerAborted {
                        reason: e.to_string(),
                    })
                }
            };
            let phase = TaskPhase::settled(outcome.is_ok());
            tracing::debug!(task = %id, %target, ?phase, "task settled");
            sender.deliver(CompletionMessage::new(id, target, outcome));
        });

        id
    }
}
