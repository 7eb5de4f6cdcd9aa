//! Log subscriber for the `artist-search` binary.
//!
//! The terminal is owned by the UI, so events go to `~/.artistsearch/log/artist-search.log`.
//! Filter priority: `ARTIST_SEARCH_LOG`, then `RUST_LOG`, then `warn`.

use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_ENV_VAR: &str = "ARTIST_SEARCH_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

pub fn default_log_path(home: &Path) -> PathBuf {
    home.join(".artistsearch")
        .join("log")
        .join("artist-search.log")
}

/// Install the global subscriber, appending to `log_path`.
pub fn init_file_subscriber(log_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create log dir {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("open log file {}", log_path.display()))?;

    let filter = build_env_filter(
        std::env::var(LOG_ENV_VAR).ok().as_deref(),
        std::env::var("RUST_LOG").ok().as_deref(),
    );
    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("install tracing subscriber")
}

/// Unparseable directives fall through to the next source instead of failing startup.
fn build_env_filter(project_directives: Option<&str>, rust_log: Option<&str>) -> EnvFilter {
    [project_directives, rust_log]
        .into_iter()
        .flatten()
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn project_variable_wins_over_rust_log() {
        let filter = build_env_filter(Some("artist_search_tui=debug"), Some("info"));
        assert_eq!(filter.to_string(), "artist_search_tui=debug");
    }

    #[test]
    fn invalid_directives_fall_through() {
        let filter = build_env_filter(Some("artist_search=loud"), Some("info"));
        assert_eq!(filter.to_string(), "info");

        let filter = build_env_filter(None, None);
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn log_file_lives_under_artistsearch_home() {
        let home = Path::new("home");
        assert_eq!(
            default_log_path(home),
            home.join(".artistsearch").join("log").join("artist-search.log")
        );
    }
}
