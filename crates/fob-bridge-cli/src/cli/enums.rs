use clap::ValueEnum;
use fob_bridge::AppMode;

/// How `resolve` prints descriptors
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Descriptor objects as pretty-printed JSON
    #[default]
    #[value(name = "json")]
    Json,

    /// Ready-to-paste `<script>` and `<link>` tags
    #[value(name = "html")]
    Html,
}

/// Application environment for `serve`
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum EnvironmentArg {
    /// Spawn and proxy the dev server
    #[value(name = "development")]
    Development,

    /// Same dev-server behavior as development
    #[value(name = "test")]
    Test,

    /// Serve built assets from the manifest only
    #[value(name = "production")]
    Production,
}

impl From<EnvironmentArg> for AppMode {
    fn from(env: EnvironmentArg) -> Self {
        match env {
            EnvironmentArg::Development => AppMode::Development,
            EnvironmentArg::Test => AppMode::Test,
            EnvironmentArg::Production => AppMode::Production,
        }
    }
}
