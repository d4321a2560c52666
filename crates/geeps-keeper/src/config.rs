//! Environment-driven configuration with built-in defaults.

use std::env;
use std::path::PathBuf;

/// Base URL of the generation service; the `openai` route is appended as-is.
const ENV_API_URL: &str = "GEEPS_API_URL";
/// Directory the exported PDF is written to.
const ENV_EXPORT_DIR: &str = "GEEPS_EXPORT_DIR";

const DEFAULT_API_URL: &str = "http://localhost:3001/";

#[derive(Debug, Clone)]
pub struct KeeperConfig {
    /// Base endpoint, read once at startup; the route suffix is appended
    /// verbatim, so a trailing slash belongs here.
    pub base_url: String,
    /// Where exports land.
    pub export_dir: PathBuf,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            base_url: env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.into()),
            export_dir: env::var(ENV_EXPORT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}
