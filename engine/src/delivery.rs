//! Hand-off from workers to the consumer thread.
//!
//! Workers hold a [`DeliverySender`] and may call [`DeliverySender::deliver`]
//! from any thread. The matching [`DeliveryQueue`] stays on the thread that
//! created it; only that thread drains messages and applies them through a
//! [`CompletionSink`], so consumer-owned state has a single writer.

use std::marker::PhantomData;
use std::rc::Rc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use tdnet_types::CompletionMessage;

/// Completions applied per call to [`DeliveryQueue::drain_pending`] by
/// frame-driven consumers. Keeps a burst of results from starving rendering.
pub const DEFAULT_DRAIN_BUDGET: usize = 64;

enum Envelope {
    Completion(CompletionMessage),
    Shutdown,
}

/// Consumer-side handler for drained messages.
pub trait CompletionSink {
    fn apply(&mut self, message: CompletionMessage);
}

impl<F> CompletionSink for F
where
    F: FnMut(CompletionMessage),
{
    fn apply(&mut self, message: CompletionMessage) {
        self(message);
    }
}

/// Producer handle. Cheap to clone, `Send + Sync`, never blocks.
#[derive(Debug, Clone)]
pub struct DeliverySender {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl DeliverySender {
    /// Enqueue a completion for the consumer.
    ///
    /// If the consumer has already been torn down the message is dropped.
    pub fn deliver(&self, message: CompletionMessage) {
        let task = message.task();
        if self.tx.send(Envelope::Completion(message)).is_err() {
            tracing::debug!(%task, "consumer gone; completion dropped");
        }
    }

    /// Ask the consumer's drain loop to return after the messages queued so far.
    pub fn request_shutdown(&self) {
        if self.tx.send(Envelope::Shutdown).is_err() {
            tracing::debug!("consumer gone; shutdown request dropped");
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// The consumer's end of the hand-off.
///
/// `!Send`: a queue can only be drained on the thread that built it.
///
/// ```compile_fail
/// let queue = tdnet_engine::DeliveryQueue::new();
/// std::thread::spawn(move || drop(queue));
/// ```
pub struct DeliveryQueue {
    tx: mpsc::UnboundedSender<Envelope>,
    rx: mpsc::UnboundedReceiver<Envelope>,
    shutdown: bool,
    _consumer: PhantomData<Rc<()>>,
}

impl DeliveryQueue {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            shutdown: false,
            _consumer: PhantomData,
        }
    }

    #[must_use]
    pub fn sender(&self) -> DeliverySender {
        DeliverySender {
            tx: self.tx.clone(),
        }
    }

    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    /// Apply up to `budget` messages that are already queued, without waiting.
    ///
    /// Returns how many completions were applied.
    pub fn drain_pending(&mut self, sink: &mut impl CompletionSink, budget: usize) -> usize {
        let mut applied = 0;
        while applied < budget && !self.shutdown {
            match self.rx.try_recv() {
                Ok(Envelope::Completion(message)) => {
                    sink.apply(message);
                    applied += 1;
                }
                Ok(Envelope::Shutdown) => self.shutdown = true,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.shutdown = true;
                }
            }
        }
        applied
    }

    /// Block the current thread, applying messages as they arrive, until a
    /// shutdown is requested.
    ///
    /// Must not be called from inside an async runtime.
    pub fn drain_loop(&mut self, sink: &mut impl CompletionSink) -> usize {
        let mut applied = 0;
        while !self.shutdown {
            match self.rx.blocking_recv() {
                Some(Envelope::Completion(message)) => {
                    sink.apply(message);
                    applied += 1;
                }
                Some(Envelope::Shutdown) | None => self.shutdown = true,
            }
        }
        tracing::debug!(applied, "drain loop stopped");
        applied
    }

    /// Wait for the next completion. `None` once shutdown has been requested.
    ///
    /// For consumers that run as a runtime's root future on their own thread.
    pub async fn recv(&mut self) -> Option<CompletionMessage> {
        if self.shutdown {
            return None;
        }
        match self.rx.recv().await {
            Some(Envelope::Completion(message)) => Some(message),
            Some(Envelope::Shutdown) | None => {
                self.shutdown = true;
                None
            }
        }
    }
}

impl Default for DeliveryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DeliveryQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryQueue")
            .field("shutdown", &self.shutdown)
            .finish_non_exhaustive()
    }
}
