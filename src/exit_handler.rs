//! Exit code logic for the harvester process.
//!
//! Single responsibility: map completion/failure counts to the process exit outcome.

use std::process::ExitCode;

/// Process exit status for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    Partial,
    Failure,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Failure => ExitCode::from(1),
            ProcessExit::Partial => ExitCode::from(2),
        }
    }
}

/// Determines the process exit outcome from completed and failed download counts.
///
/// Without `strict` a run always succeeds; per-item failures are reported,
/// not escalated.
pub(crate) fn determine_exit_outcome(strict: bool, completed: usize, failed: usize) -> ProcessExit {
    if !strict || failed == 0 {
        ProcessExit::Success
    } else if completed > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}
