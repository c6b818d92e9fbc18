//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error
/// - 2: Misuse of shell command (reserved by shells, used by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Clean exit, including shutdown on SIGINT/SIGTERM.
    pub const SUCCESS: i32 = 0;

    /// Fatal error (I/O, crypto setup).
    pub const FAILURE: i32 = 1;

    /// Invalid user input, arguments, or config file.
    pub const INVALID_INPUT: i32 = 4;

    /// One or more replayed records failed authentication or decoding.
    pub const AUTH_FAILED: i32 = 5;
}
