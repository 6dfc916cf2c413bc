use crate::algebra::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a solver does when it meets an illegal argument or cannot
/// allocate its workspace.
///
/// Either way the entry point still returns the matching status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ErrorHook {
    /// Log a diagnostic and return.
    #[default]
    Report,
    /// Print a diagnostic to stderr and terminate the process.
    Abort,
}

impl ErrorHook {
    /// Hands `error` to the hook.  Convergence failures are not
    /// argument errors and are ignored.
    pub fn raise(&self, error: &LapackError) {
        match (self, error) {
            (_, LapackError::NoConvergence { .. }) => {}
            (ErrorHook::Report, _) => log::error!("{}", report_message(error)),
            (ErrorHook::Abort, LapackError::IllegalParameter { routine, index }) => {
                eprintln!(
                    " ** On entry to {} parameter number {} had an illegal value",
                    routine.trim_end(),
                    index
                );
                std::process::exit(1);
            }
            (ErrorHook::Abort, _) => {
                eprintln!("{}", report_message(error));
                std::process::exit(1);
            }
        }
    }
}

fn report_message(error: &LapackError) -> String {
    match error {
        LapackError::IllegalParameter { routine, index } => {
            format!("Wrong parameter {} in {}", index, routine)
        }
        LapackError::WorkspaceAllocation { routine } => {
            format!("Not enough memory to allocate work array in {}", routine)
        }
        LapackError::TransposeAllocation { routine } => {
            format!("Not enough memory to transpose matrix in {}", routine)
        }
        LapackError::NoConvergence { .. } => error.to_string(),
    }
}

#[test]
fn test_report_messages() {
    assert_eq!(
        report_message(&LapackError::illegal("SYEV", 3)),
        "Wrong parameter 3 in SYEV"
    );
    assert_eq!(
        report_message(&LapackError::WorkspaceAllocation { routine: "LAPACKE_syev" }),
        "Not enough memory to allocate work array in LAPACKE_syev"
    );
    assert_eq!(
        report_message(&LapackError::TransposeAllocation { routine: "LAPACKE_syev_work" }),
        "Not enough memory to transpose matrix in LAPACKE_syev_work"
    );

    // reporting returns to the caller
    ErrorHook::Report.raise(&LapackError::illegal("SYEV", 1));
    ErrorHook::Abort.raise(&LapackError::NoConvergence { count: 1 });
}
