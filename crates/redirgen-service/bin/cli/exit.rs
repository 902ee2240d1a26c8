//! Process exit statuses.

use redirgen_core::Outcome;
use redirgen_service::CommandError;

pub const SUCCESS: u8 = 0;
pub const FAILURE: u8 = 1;
/// Invalid invocation, the same status clap exits with.
pub const USAGE: u8 = 2;

/// Status of an `add` that ran to completion.
pub fn for_outcome(outcome: &Outcome) -> u8 {
    if outcome.is_rejected() {
        FAILURE
    } else {
        SUCCESS
    }
}

/// Status of a command that failed with `error`.
pub fn for_error(error: &CommandError) -> u8 {
    if error.is_usage_error() {
        USAGE
    } else {
        FAILURE
    }
}
