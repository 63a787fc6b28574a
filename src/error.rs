//! Process exit codes.

/// Exit codes for the dupsweep binary.
///
/// - 0: run completed (duplicates or not)
/// - 1: unexpected failure
/// - 2: invalid configuration, nothing was scanned
/// - 3: run completed but some files could not be read or deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The run completed.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// Configuration was rejected before any I/O.
    ConfigurationError = 2,
    /// A file could not be scanned, hashed or removed.
    PartialSuccess = 3,
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
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::ConfigurationError => "DS002",
            Self::PartialSuccess => "DS003",
        }
    }

    /// Pick the exit code for an error that escaped `run_app`.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        let finder_config = matches!(
            err.downcast_ref::<crate::duplicates::FinderError>(),
            Some(crate::duplicates::FinderError::Config(_))
        );
        if finder_config || err.downcast_ref::<crate::config::ConfigError>().is_some() {
            Self::ConfigurationError
        } else {
            Self::GeneralError
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // All variants fit in a u8.
        std::process::ExitCode::from(code as u8)
    }
}
