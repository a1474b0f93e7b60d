//! Host application environment.

use std::fmt;
use std::str::FromStr;

/// Variables consulted for the application mode, in order.
pub const MODE_ENV_VARS: &[&str] = &["APP_ENV", "NODE_ENV"];
/// Variable naming the kind of process the host is running as.
pub const PROCESS_ENV_VAR: &str = "FOB_BRIDGE_PROCESS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    Development,
    Test,
    #[default]
    Production,
}

impl FromStr for AppMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" | "testing" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown application mode '{}'", other)),
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        })
    }
}

/// What the host process is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessKind {
    /// Serving HTTP requests
    #[default]
    Web,
    /// Running the test suite
    Test,
    /// One-off command
    Console,
    Repl,
}

impl FromStr for ProcessKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(Self::Web),
            "test" => Ok(Self::Test),
            "console" => Ok(Self::Console),
            "repl" => Ok(Self::Repl),
            other => Err(format!("unknown process kind '{}'", other)),
        }
    }
}

/// Application mode plus process kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppEnvironment {
    pub mode: AppMode,
    pub process: ProcessKind,
}

impl AppEnvironment {
    pub fn new(mode: AppMode, process: ProcessKind) -> Self {
        Self { mode, process }
    }

    /// Read `APP_ENV`/`NODE_ENV` and `FOB_BRIDGE_PROCESS`.
    ///
    /// Unknown values are logged and replaced by the defaults
    /// (production, web).
    pub fn from_env() -> Self {
        let mode = MODE_ENV_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok())
            .map(|value| {
                value.parse().unwrap_or_else(|e| {
                    tracing::warn!("{}; assuming production", e);
                    AppMode::Production
                })
            })
            .unwrap_or_default();

        let process = std::env::var(PROCESS_ENV_VAR)
            .ok()
            .map(|value| {
                value.parse().unwrap_or_else(|e| {
                    tracing::warn!("{}; assuming web", e);
                    ProcessKind::Web
                })
            })
            .unwrap_or_default();

        Self { mode, process }
    }

    /// The dev server runs only for web or test processes in development
    /// or test mode.
    pub fn should_run_dev_server(&self) -> bool {
        matches!(self.mode, AppMode::Development | AppMode::Test)
            && matches!(self.process, ProcessKind::Web | ProcessKind::Test)
    }
}
