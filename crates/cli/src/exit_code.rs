//! Process exit codes

/// Exit codes reported by the `lakegate` binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    /// Bad arguments or a request the gateway rejected
    UsageError = 2,
    /// The gateway could not bind or serve
    NetworkError = 3,
    /// Configuration or seed file is invalid
    ConfigError = 4,
    NotFound = 5,
}
