//! Consumer-owned display state and per-task phase tracking.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;

use tdnet_types::{
    CompletionMessage, ImageBitmap, Payload, TaskId, TaskPhase, Target, TransitionError,
};

use crate::delivery::CompletionSink;

/// What the presentation layer shows: the fetched text and the fetched image.
///
/// `!Send`, like the queue that feeds it: it lives and dies on the consumer thread.
#[derive(Debug, Default)]
pub struct ConsumerState {
    text: String,
    image: Option<ImageBitmap>,
    _consumer: PhantomData<Rc<()>>,
}

impl ConsumerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageBitmap> {
        self.image.as_ref()
    }

    pub fn clear(&mut self, target: Target) {
        match target {
            Target::Text => self.text.clear(),
            Target::Image => self.image = None,
        }
    }
}

impl CompletionSink for ConsumerState {
    fn apply(&mut self, message: CompletionMessage) {
        let task = message.task();
        let target = message.target();
        match message.into_outcome() {
            Ok(Payload::Text(text)) => self.text = text.into_string(),
            Ok(Payload::Image(bitmap)) => self.image = Some(bitmap),
            Err(err) => {
                tracing::warn!(%task, %target, code = err.code(), "fetch failed: {err}");
                self.clear(target);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Tracked {
    target: Target,
    phase: TaskPhase,
}

/// Phases of tasks started by this consumer that have not been delivered yet.
#[derive(Debug, Default)]
pub struct TaskTracker {
    tasks: HashMap<TaskId, Tracked>,
}

impl TaskTracker {
    pub fn started(&mut self, task: TaskId, target: Target) -> Result<(), TransitionError> {
        let phase = TaskPhase::Idle.advance(TaskPhase::Running)?;
        self.tasks.insert(task, Tracked { target, phase });
        Ok(())
    }

    /// Record delivery of `task`, passing through its settled phase.
    pub fn delivered(&mut self, task: TaskId, success: bool) -> Result<TaskPhase, TransitionError> {
        let current = self.tasks.get(&task).map_or(TaskPhase::Idle, |t| t.phase);
        let phase = current
            .advance(TaskPhase::settled(success))?
            .advance(TaskPhase::Delivered)?;
        self.tasks.remove(&task);
        Ok(phase)
    }

    #[must_use]
    pub fn phase(&self, task: TaskId) -> Option<TaskPhase> {
        self.tasks.get(&task).map(|t| t.phase)
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_running(&self, target: Target) -> bool {
        self.tasks.values().any(|t| t.target == target)
    }
}
