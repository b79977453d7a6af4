//! I define [`Deadline`], the wall-clock budget of a canonicalization run.

use std::time::{Duration, Instant};

use crate::C14nError;

/// A wall-clock budget shared by all the potentially expensive steps of a run.
///
/// The first call to [`tick`](Deadline::tick) records the start instant;
/// every later call fails with [`C14nError::DeadlineExceeded`]
/// once the elapsed time reaches the budget.
/// A budget of zero therefore fails on the first tick after the start.
#[derive(Clone, Debug)]
pub struct Deadline {
    budget_ms: i64,
    budget: Duration,
    started: Option<Instant>,
}

impl Deadline {
    /// Build a deadline with the given budget in milliseconds.
    ///
    /// Negative budgets are rejected with [`C14nError::InvalidDeadline`].
    pub fn new(budget_ms: i64) -> Result<Self, C14nError> {
        if budget_ms < 0 {
            return Err(C14nError::InvalidDeadline(budget_ms));
        }
        Ok(Deadline {
            budget_ms,
            budget: Duration::from_millis(budget_ms as u64),
            started: None,
        })
    }

    /// Report progress, failing if the budget is exhausted.
    pub fn tick(&mut self) -> Result<(), C14nError> {
        match self.started {
            None => {
                self.started = Some(Instant::now());
                Ok(())
            }
            Some(started) => {
                if started.elapsed() >= self.budget {
                    Err(C14nError::DeadlineExceeded {
                        budget_ms: self.budget_ms,
                    })
                } else {
                    Ok(())
                }
            }
        }
    }
}
