//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage error (bad args, bad `--today`)                |
//! | 3    | Input file missing, unreadable or malformed          |
//! | 4    | Invalid engine config                                |
//! | 5    | Plan came out empty and `--fail-on-empty` was given  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant with the next free number
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use fieldplan_engine::EngineError;
use fieldplan_io::IoError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// An input CSV or config file could not be read or parsed.
pub const EXIT_INPUT: u8 = 3;

/// Config file parsed but failed validation, or has unknown keys.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// No prospect scored high enough to plan (only with `--fail-on-empty`).
pub const EXIT_EMPTY_PLAN: u8 = 5;

/// Map an io-crate error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Io(_) | IoError::Csv(_) | IoError::Empty(_) => EXIT_INPUT,
    }
}

/// Map an engine error to its exit code.
pub fn engine_exit_code(err: &EngineError) -> u8 {
    match err {
        EngineError::ConfigParse(_) | EngineError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
    }
}
