//! Error categories shared by the controller crates.
//!
//! Categories map onto UNIX sysexits.h-compliant exit codes so callers
//! (scripts, CI) can react to failure classes without parsing messages.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller-supplied input was invalid.
    InvalidInput,
    /// A required runtime, file, or service was not available.
    NotFound,
    /// The resource is held by another process.
    Busy,
    /// An external process or service failed.
    External,
    /// A bug in this controller.
    Internal,
    /// The operation was cut short.
    Timeout,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidInput => "invalid_input",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Busy => "busy",
            ErrorCategory::External => "external",
            ErrorCategory::Internal => "internal",
            ErrorCategory::Timeout => "timeout",
        }
    }

    /// UNIX sysexits.h-compliant exit code for this category.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCategory::InvalidInput => 64, // EX_USAGE
            ErrorCategory::NotFound => 69,     // EX_UNAVAILABLE
            ErrorCategory::Busy => 73,         // EX_CANTCREAT
            ErrorCategory::External => 74,     // EX_IOERR
            ErrorCategory::Internal => 74,     // EX_IOERR
            ErrorCategory::Timeout => 75,      // EX_TEMPFAIL
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_sysexits() {
        assert_eq!(ErrorCategory::InvalidInput.exit_code(), 64);
        assert_eq!(ErrorCategory::NotFound.exit_code(), 69);
        assert_eq!(ErrorCategory::Busy.exit_code(), 73);
        assert_eq!(ErrorCategory::External.exit_code(), 74);
        assert_eq!(ErrorCategory::Timeout.exit_code(), 75);
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(ErrorCategory::Busy.to_string(), "busy");
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
    }
}
