//! Version and usage output.

/// The current version of tootview, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Usage text printed for `--help` and unrecognized arguments.
pub const USAGE: &str = "\
Usage: tootview <replay.json>

Replays section snapshots and interactions from a JSON script through a
collection reconciler and prints each published update as a JSON line.

Options:
  -h, --help       Show this message
  -V, --version    Show version

Environment:
  TOOTVIEW_LOG                   Log filter (default: info)
  TOOTVIEW_MARKER_DEBOUNCE_MS    Read marker debounce (default: 500)";

/// Handle the --version command.
pub fn handle_version_command() {
    println!("tootview {}", VERSION);
}

pub fn handle_help_command() {
    println!("{}", USAGE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_not_empty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_version_format() {
        // Version should be in semver format (e.g., "0.1.0")
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_usage_mentions_environment() {
        assert!(USAGE.contains("TOOTVIEW_LOG"));
        assert!(USAGE.contains("TOOTVIEW_MARKER_DEBOUNCE_MS"));
    }
}
