/// Graceful quit signals sent to one encoder before escalating to a kill.
pub const MAX_QUIT_ATTEMPTS: u32 = 3;

/// What a stop request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopAction {
    /// Wrote the quit signal; `attempt` counts from 1.
    Quit {
        /// Attempt number for this process.
        attempt: u32,
    },
    /// Requested forced termination.
    Kill,
    /// The process had already exited; nothing was sent.
    Inert,
}

/// Retry counter bound to one subprocess. Never reset.
#[derive(Debug, Default)]
pub(crate) struct QuitBudget {
    attempts: u32,
}

impl QuitBudget {
    /// Consumes one quit attempt, or escalates once the budget is spent or
    /// the process has no input stream.
    pub(crate) fn next_action(&mut self, stdin_available: bool) -> StopAction {
        if stdin_available && self.attempts < MAX_QUIT_ATTEMPTS {
            self.attempts += 1;
            StopAction::Quit {
                attempt: self.attempts,
            }
        } else {
            StopAction::Kill
        }
    }
}
