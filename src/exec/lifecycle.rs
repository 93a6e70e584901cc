// src/exec/lifecycle.rs

/// Where a supervised run currently is.
///
/// ```text
/// NotStarted → Starting → Running → Draining → Completed
///                  └────→ FailedToStart
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    NotStarted,
    /// Pipes are being set up and the process spawned.
    Starting,
    /// The process is up; the noticer dispatch has been launched.
    Running,
    /// Both output pipes are being drained.
    Draining,
    /// Exit resolved, report delivered, noticers joined.
    Completed,
    /// The process never started.
    FailedToStart,
}

impl Lifecycle {
    pub fn can_advance_to(self, next: Lifecycle) -> bool {
        use Lifecycle::*;
        matches!(
            (self, next),
            (NotStarted, Starting)
                | (Starting, Running)
                | (Starting, FailedToStart)
                | (Running, Draining)
                | (Draining, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Lifecycle::Completed | Lifecycle::FailedToStart)
    }
}
