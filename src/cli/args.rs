//! Command-line argument parsing for tootview.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use std::path::PathBuf;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Replay a JSON script through a reconciler
    Replay(PathBuf),
}

/// Parse command-line arguments and return the appropriate command.
///
/// The first flag wins; otherwise the first positional argument is the
/// replay script. With neither, usage is shown.
///
/// # Examples
///
/// ```
/// use tootview::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["tootview".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut script = None;
    for arg in args.skip(1) {
        // Skip the program name
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            flag if flag.starts_with('-') => return CliCommand::Help,
            path => {
                if script.is_none() {
                    script = Some(PathBuf::from(path));
                }
            }
        }
    }
    script.map_or(CliCommand::Help, CliCommand::Replay)
}
