//! The consumer context: triggers, delivery draining and display state.
//!
//! [`App`] is created on the consumer thread and never leaves it. Triggers
//! start fetches through a [`TaskRunner`]; results come back only through the
//! delivery queue and are applied here, so display state is never touched
//! from a worker.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::runtime::Handle;

use tdnet_fetch::{
    ClientBuildError, HttpTransport, ImageDecoder, ResolvedConfig, StandardDecoder, Transport,
    fetch_image, fetch_text,
};
use tdnet_types::{CompletionMessage, FetchError, Payload, TaskId, Target};

use crate::connectivity::{Connectivity, RouteConnectivity};
use crate::delivery::{CompletionSink, DEFAULT_DRAIN_BUDGET, DeliveryQueue, DeliverySender};
use crate::notifications::Notification;
use crate::runner::TaskRunner;
use crate::state::{ConsumerState, TaskTracker};

/// External collaborators the consumer delegates to.
#[derive(Clone)]
pub struct Collaborators {
    pub transport: Arc<dyn Transport>,
    pub decoder: Arc<dyn ImageDecoder>,
    pub connectivity: Arc<dyn Connectivity>,
}

impl Collaborators {
    /// `reqwest` transport, `image` decoder and route-based connectivity.
    pub fn standard(config: &ResolvedConfig) -> Result<Self, ClientBuildError> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new(config)?),
            decoder: Arc::new(StandardDecoder),
            connectivity: Arc::new(RouteConnectivity::default()),
        })
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

pub struct App {
    config: ResolvedConfig,
    runtime: Handle,
    transport: Arc<dyn Transport>,
    decoder: Arc<dyn ImageDecoder>,
    connectivity: Arc<dyn Connectivity>,
    queue: DeliveryQueue,
    state: ConsumerState,
    tracker: TaskTracker,
    notifications: VecDeque<Notification>,
}

impl App {
    /// Build the consumer context. Workers are spawned on `runtime`.
    #[must_use]
    pub fn new(config: ResolvedConfig, runtime: Handle, collaborators: Collaborators) -> Self {
        let Collaborators {
            transport,
            decoder,
            connectivity,
        } = collaborators;
        Self {
            config,
            runtime,
            transport,
            decoder,
            connectivity,
            queue: DeliveryQueue::new(),
            state: ConsumerState::new(),
            tracker: TaskTracker::default(),
            notifications: VecDeque::new(),
        }
    }

    /// Clear the text field and start fetching the configured text target.
    ///
    /// Returns `Err(FetchError::NetworkUnavailable)` without starting a task
    /// when the connectivity gate reports no network.
    pub fn fetch_text(&mut self) -> Result<Option<TaskId>, FetchError> {
        self.state.clear(Target::Text);
        self.ensure_online(Target::Text)?;

        let transport = Arc::clone(&self.transport);
        let max_chars = self.config.max_text_chars;
        let runner = TaskRunner::new(Target::Text, self.runtime.clone(), self.queue.sender());
        let started = runner.submit(vec![self.config.text_url.clone()], move |targets| async move {
            let target = targets.into_iter().next().unwrap_or_default();
            fetch_text(transport.as_ref(), &target, max_chars)
                .await
                .map(Payload::Text)
        });

        Ok(self.track(started, Target::Text))
    }

    /// Clear the image field and start fetching the configured image target.
    pub fn fetch_image(&mut self) -> Result<Option<TaskId>, FetchError> {
        self.state.clear(Target::Image);
        self.ensure_online(Target::Image)?;

        let transport = Arc::clone(&self.transport);
        let decoder = Arc::clone(&self.decoder);
        let max_bytes = self.config.max_image_bytes;
        let runner = TaskRunner::new(Target::Image, self.runtime.clone(), self.queue.sender());
        let started = runner.submit(vec![self.config.image_url.clone()], move |targets| async move {
            let target = targets.into_iter().next().unwrap_or_default();
            fetch_image(transport.as_ref(), decoder, &target, max_bytes)
                .await
                .map(Payload::Image)
        });

        Ok(self.track(started, Target::Image))
    }

    /// Dispatch a trigger by target.
    pub fn trigger(&mut self, target: Target) -> Result<Option<TaskId>, FetchError> {
        match target {
            Target::Text => self.fetch_text(),
            Target::Image => self.fetch_image(),
        }
    }

    fn ensure_online(&mut self, target: Target) -> Result<(), FetchError> {
        if self.connectivity.is_online() {
            return Ok(());
        }
        tracing::warn!(%target, "network unavailable; fetch not started");
        self.notifications
            .push_back(Notification::NetworkUnavailable { target });
        Err(FetchError::NetworkUnavailable)
    }

    fn track(&mut self, started: Option<TaskId>, target: Target) -> Option<TaskId> {
        let task = started?;
        if let Err(e) = self.tracker.started(task, target) {
            tracing::warn!(%task, %target, "untracked task: {e}");
        }
        Some(task)
    }

    /// Apply up to one frame's worth of pending completions without blocking.
    pub fn process_deliveries(&mut self) -> usize {
        let mut applier = Applier {
            state: &mut self.state,
            tracker: &mut self.tracker,
        };
        self.queue.drain_pending(&mut applier, DEFAULT_DRAIN_BUDGET)
    }

    /// Block the consumer thread applying completions until shutdown is requested.
    ///
    /// Must not be called from inside the runtime's async context.
    pub fn run_until_shutdown(&mut self) -> usize {
        let mut applier = Applier {
            state: &mut self.state,
            tracker: &mut self.tracker,
        };
        self.queue.drain_loop(&mut applier)
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `false` once shutdown has been requested.
    pub async fn next_delivery(&mut self) -> bool {
        let Some(message) = self.queue.recv().await else {
            return false;
        };
        Applier {
            state: &mut self.state,
            tracker: &mut self.tracker,
        }
        .apply(message);
        true
    }

    /// A handle producers and other threads can use to post or stop delivery.
    #[must_use]
    pub fn sender(&self) -> DeliverySender {
        self.queue.sender()
    }

    #[must_use]
    pub fn state(&self) -> &ConsumerState {
        &self.state
    }

    pub fn pop_notification(&mut self) -> Option<Notification> {
        self.notifications.pop_front()
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tracker.in_flight()
    }

    #[must_use]
    pub fn is_running(&self, target: Target) -> bool {
        self.tracker.is_running(target)
    }

    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.queue.is_shutdown()
    }

    #[must_use]
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("tracker", &self.tracker)
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}

struct Applier<'a> {
    state: &'a mut ConsumerState,
    tracker: &'a mut TaskTracker,
}

impl CompletionSink for Applier<'_> {
    fn apply(&mut self, message: CompletionMessage) {
        let task = message.task();
        match self.tracker.delivered(task, message.is_success()) {
            Ok(phase) => tracing::debug!(%task, ?phase, "completion applied"),
            Err(e) => tracing::warn!(%task, "delivery for untracked task: {e}"),
        }
        self.state.apply(message);
    }
}
