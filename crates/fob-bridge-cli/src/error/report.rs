//! Miette report conversion for CLI errors.

use miette::{miette, Report};

use super::{CliError, ConfigError};
use fob_bridge_config::CONFIG_FILE_NAME;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Bridge(e) => Report::new(e),
        CliError::Config(e) => config_error_to_miette(e),
        CliError::InvalidArgument(msg) => miette!(
            help = "Run 'fob-bridge --help' to see the accepted arguments",
            "Invalid argument: {}",
            msg
        ),
        CliError::Template(e) => miette!(
            help = "A template helper failed; the cause is shown above",
            "Template error: {:#}",
            e
        ),
        other => miette!("{}", other),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::Parse { path, message } => miette!(
            code = "fob_bridge::config::parse",
            help = format!("Check the syntax of {}", path.display()),
            "Failed to parse {}: {}",
            path.display(),
            message
        ),
        ConfigError::InvalidValue { field, hint } => miette!(
            code = "fob_bridge::config::invalid_value",
            help = hint.unwrap_or_else(|| format!("Review '{field}' in {CONFIG_FILE_NAME}")),
            "Invalid configuration value for '{}'",
            field
        ),
        other => miette!("Configuration error: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_bridge_error_keeps_diagnostic_code() {
        let report = cli_error_to_miette(CliError::Bridge(fob_bridge::Error::EntryNotFound {
            name: "app.js".into(),
            manifest: PathBuf::from("manifest.json"),
        }));
        assert!(report.code().is_some());
        assert!(report.to_string().contains("app.js"));
    }

    #[test]
    fn test_config_parse_report_has_help() {
        let report = cli_error_to_miette(CliError::Config(ConfigError::Parse {
            path: PathBuf::from("fob-bridge.toml"),
            message: "expected `=`".into(),
        }));
        assert!(report.to_string().contains("fob-bridge.toml"));
        let help = report.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("fob-bridge.toml"));
    }

    #[test]
    fn test_other_errors_use_display() {
        let report = cli_error_to_miette(CliError::Server("address in use".into()));
        assert_eq!(report.to_string(), "Server error: address in use");
    }
}
