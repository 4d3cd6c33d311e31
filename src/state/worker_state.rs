/// Worker lifecycle tracking, from the controller's point of view
///
/// A worker moves `Spawned -> Running -> Exited`. There is no paused or retry
/// state: a denied link is simply dropped by the worker.
use crate::FanoutError;
use std::fmt;

/// Identifier handed to each spawned worker
pub type WorkerId = usize;

/// Lifecycle state of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Task created, no report received yet
    Spawned,

    /// At least one link has been reported
    Running,

    /// The task has finished, cleanly or not
    Exited,
}

impl WorkerState {
    /// Returns true if moving from `self` to `next` is allowed
    ///
    /// A worker may exit from any live state; a worker that never reports
    /// goes straight from `Spawned` to `Exited`.
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        matches!(
            (self, next),
            (Self::Spawned, Self::Running)
                | (Self::Spawned, Self::Exited)
                | (Self::Running, Self::Running)
                | (Self::Running, Self::Exited)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spawned => "spawned",
            Self::Running => "running",
            Self::Exited => "exited",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a worker task ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerExit {
    /// Ran out of links to report
    Clean,

    /// Lost its channel to the controller
    Failed(String),

    /// The task panicked or was aborted
    Crashed(String),
}

impl WorkerExit {
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }
}

impl fmt::Display for WorkerExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => write!(f, "successfully exited"),
            Self::Failed(reason) => write!(f, "exited with error: {}", reason),
            Self::Crashed(reason) => write!(f, "crashed: {}", reason),
        }
    }
}

/// The controller's record of one spawned worker
#[derive(Debug, Clone)]
pub struct WorkerRecord {
    pub id: WorkerId,
    pub starting_url: String,
    pub state: WorkerState,
    /// Links this worker reported
    pub reported: u64,
    /// Reports answered with an authorization
    pub authorized: u64,
}

impl WorkerRecord {
    pub fn new(id: WorkerId, starting_url: impl Into<String>) -> Self {
        Self {
            id,
            starting_url: starting_url.into(),
            state: WorkerState::Spawned,
            reported: 0,
            authorized: 0,
        }
    }

    /// Moves the record to `next`, rejecting transitions out of `Exited`
    pub fn transition(&mut self, next: WorkerState) -> Result<(), FanoutError> {
        if !self.state.can_transition_to(next) {
            return Err(FanoutError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}
