//! Per-task lifecycle.

use thiserror::Error;

/// Where a task is in its single pass from trigger to display.
///
/// `Idle -> Running -> {Completed | Failed} -> Delivered`; nothing moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskPhase {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
    Delivered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("task cannot move from {from:?} to {to:?}")]
pub struct TransitionError {
    pub from: TaskPhase,
    pub to: TaskPhase,
}

impl TaskPhase {
    #[must_use]
    pub fn can_advance_to(self, to: TaskPhase) -> bool {
        matches!(
            (self, to),
            (TaskPhase::Idle, TaskPhase::Running)
                | (TaskPhase::Running, TaskPhase::Completed | TaskPhase::Failed)
                | (TaskPhase::Completed | TaskPhase::Failed, TaskPhase::Delivered)
        )
    }

    pub fn advance(self, to: TaskPhase) -> Result<TaskPhase, TransitionError> {
        if self.can_advance_to(to) {
            Ok(to)
        } else {
            Err(TransitionError { from: self, to })
        }
    }

    /// Phase reached when a worker finishes with the given outcome.
    #[must_use]
    pub fn settled(success: bool) -> TaskPhase {
        if success {
            TaskPhase::Completed
        } else {
            TaskPhase::Failed
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == TaskPhase::Delivered
    }
}
