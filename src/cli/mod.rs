//! CLI module for tootview.
//!
//! Argument parsing and the commands that finish without touching a
//! reconciler.
//!
//! # Usage
//!
//! ```ignore
//! use tootview::cli::{parse_args, run_cli_command, CliCommand};
//!
//! let command = parse_args(std::env::args());
//! if run_cli_command(&command) {
//!     return Ok(());
//! }
//! // Replay command, continue in main
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use version::{handle_help_command, handle_version_command, USAGE, VERSION};

/// Run a command that needs no runtime.
///
/// Returns true if the command was handled here.
pub fn run_cli_command(command: &CliCommand) -> bool {
    match command {
        CliCommand::Version => {
            handle_version_command();
            true
        }
        CliCommand::Help => {
            handle_help_command();
            true
        }
        CliCommand::Replay(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_replay_is_not_handled_here() {
        assert!(!run_cli_command(&CliCommand::Replay(PathBuf::from("x.json"))));
    }

    #[test]
    fn test_version_is_handled() {
        assert!(run_cli_command(&CliCommand::Version));
    }
}
