//! Exit codes for the retrial application.

/// Exit codes:
/// - 0: Success (command completed; step failures inside a reset still
///   count as success, they are reported in the summary)
/// - 1: General error (unexpected failure)
/// - 2: Another instance already holds the agent lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: the command ran to completion.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// Already running: the single-instance lock is held elsewhere.
    AlreadyRunning = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "TR000",
            Self::GeneralError => "TR001",
            Self::AlreadyRunning => "TR002",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_integers() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::AlreadyRunning.as_i32(), 2);
    }

    #[test]
    fn prefixes_are_distinct() {
        assert_ne!(
            ExitCode::Success.code_prefix(),
            ExitCode::GeneralError.code_prefix()
        );
    }
}
