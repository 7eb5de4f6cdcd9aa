mod atomic_write;
mod config;
mod tracing_setup;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use artist_search_lookup::DEFAULT_LOOKUP_ENDPOINT;
use artist_search_lookup::HttpLookupGateway;
use artist_search_lookup::LookupGateway;
use artist_search_tui::AppConfig;
use artist_search_tui::DEFAULT_BLUR_GRACE;
use artist_search_tui::DEFAULT_LOOKUP_TIMEOUT;
use artist_search_tui::DEFAULT_THROTTLE_WINDOW;
use clap::CommandFactory;
use clap::FromArgMatches;
use clap::Parser;
use clap::Subcommand;

use crate::config::ConfigStore;
use crate::config::FileConfig;

const DEFAULT_GRAPH_SIZE: i64 = 18;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Search artists by name as you type and pick one to explore"
)]
struct Cli {
    /// Base URL of the artist lookup service.
    #[arg(long, env = "ARTIST_SEARCH_ENDPOINT")]
    endpoint: Option<String>,

    /// Throttle window for lookups, in milliseconds.
    #[arg(long)]
    throttle_ms: Option<u64>,

    /// How long the dropdown stays open after the input loses focus, in milliseconds.
    #[arg(long)]
    blur_grace_ms: Option<u64>,

    /// Per-request lookup timeout, in milliseconds.
    #[arg(long)]
    lookup_timeout_ms: Option<u64>,

    /// Starting "web size" (number of similar artists).
    #[arg(long, allow_negative_numbers = true)]
    size: Option<i64>,

    /// Read settings from this file instead of `~/.artistsearch/config.toml`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Store the final web size as the default for the next session.
    #[arg(long)]
    save_size: bool,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Run one lookup and print the candidates as JSON.
    Lookup {
        /// Artist name (or prefix) to look up.
        query: String,
    },
}

/// Effective settings after layering CLI flags over `config.toml` over built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    endpoint: String,
    throttle_window: Duration,
    blur_grace: Duration,
    lookup_timeout: Duration,
    default_size: i64,
}

fn resolve_settings(cli: &Cli, file: &FileConfig) -> Settings {
    let millis = |flag: Option<u64>, file: Option<u64>, default: Duration| {
        flag.or(file).map_or(default, Duration::from_millis)
    };

    Settings {
        endpoint: cli
            .endpoint
            .clone()
            .or_else(|| file.lookup_endpoint.clone())
            .unwrap_or_else(|| DEFAULT_LOOKUP_ENDPOINT.to_string()),
        throttle_window: millis(
            cli.throttle_ms,
            file.throttle_window_ms,
            DEFAULT_THROTTLE_WINDOW,
        ),
        blur_grace: millis(cli.blur_grace_ms, file.blur_grace_ms, DEFAULT_BLUR_GRACE),
        lookup_timeout: millis(
            cli.lookup_timeout_ms,
            file.lookup_timeout_ms,
            DEFAULT_LOOKUP_TIMEOUT,
        ),
        default_size: cli.size.or(file.default_size).unwrap_or(DEFAULT_GRAPH_SIZE),
    }
}

fn parse_cli() -> Cli {
    let matches = Cli::command()
        .version(artist_search_tui::ARTIST_SEARCH_VERSION)
        .get_matches();
    Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = parse_cli();

    match dirs::home_dir() {
        Some(home) => {
            if let Err(err) =
                tracing_setup::init_file_subscriber(&tracing_setup::default_log_path(&home))
            {
                eprintln!("warning: logging disabled: {err:#}");
            }
        }
        None => eprintln!("warning: logging disabled: cannot determine home directory"),
    }

    let store = match cli.config.clone() {
        Some(path) => Some(ConfigStore::new(path)),
        None => match ConfigStore::new_default() {
            Ok(store) => Some(store),
            Err(err) => {
                eprintln!("warning: failed to locate artist-search config: {err}");
                None
            }
        },
    };
    let file_config = match store.as_ref().map(ConfigStore::load).transpose() {
        Ok(file_config) => file_config.unwrap_or_default(),
        Err(err) => {
            eprintln!("warning: ignoring config: {err:#}");
            FileConfig::default()
        }
    };

    let settings = resolve_settings(&cli, &file_config);
    tracing::debug!(?settings, "resolved settings");

    let gateway = HttpLookupGateway::new(&settings.endpoint)
        .with_context(|| format!("configure lookup endpoint {}", settings.endpoint))?;

    if let Some(CliCommand::Lookup { query }) = cli.command {
        return run_lookup(&gateway, &query, settings.lookup_timeout).await;
    }

    let exit_info = artist_search_tui::run_artist_search(AppConfig {
        gateway: Arc::new(gateway),
        throttle_window: settings.throttle_window,
        blur_grace: settings.blur_grace,
        lookup_timeout: settings.lookup_timeout,
        similar_artists_limit: settings.default_size,
    })
    .await?;

    let outcome = exit_info.outcome;
    if cli.save_size && outcome.similar_artists_limit != settings.default_size {
        match store.as_ref() {
            Some(store) => {
                if let Err(err) = store.set_default_size(outcome.similar_artists_limit) {
                    eprintln!("warning: failed to persist config: {err:#}");
                }
            }
            None => eprintln!("warning: no config location to save the web size to"),
        }
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).context("serialize search outcome")?
    );
    Ok(())
}

async fn run_lookup(
    gateway: &HttpLookupGateway,
    query: &str,
    lookup_timeout: Duration,
) -> anyhow::Result<()> {
    let candidates = tokio::time::timeout(lookup_timeout, gateway.lookup(query))
        .await
        .map_err(|_| artist_search_lookup::LookupError::TimedOut(lookup_timeout))
        .and_then(|result| result)
        .with_context(|| format!("look up {query:?}"))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&candidates).context("serialize candidates")?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("artist-search").chain(args.iter().copied()))
            .expect("parse args")
    }

    #[test]
    fn defaults_apply_without_flags_or_file() {
        let settings = resolve_settings(&parse(&[]), &FileConfig::default());
        assert_eq!(
            settings,
            Settings {
                endpoint: DEFAULT_LOOKUP_ENDPOINT.to_string(),
                throttle_window: Duration::from_millis(800),
                blur_grace: Duration::from_millis(100),
                lookup_timeout: Duration::from_secs(5),
                default_size: 18,
            }
        );
    }

    #[test]
    fn flags_override_file_values() {
        let file = FileConfig {
            lookup_endpoint: Some("http://from-file".to_string()),
            throttle_window_ms: Some(500),
            blur_grace_ms: Some(250),
            lookup_timeout_ms: None,
            default_size: Some(30),
        };
        let cli = parse(&[
            "--endpoint",
            "http://from-flag",
            "--throttle-ms",
            "200",
            "--size",
            "-2",
        ]);

        assert_eq!(
            resolve_settings(&cli, &file),
            Settings {
                endpoint: "http://from-flag".to_string(),
                throttle_window: Duration::from_millis(200),
                blur_grace: Duration::from_millis(250),
                lookup_timeout: Duration::from_secs(5),
                default_size: -2,
            }
        );
    }

    #[test]
    fn lookup_subcommand_takes_query() {
        let cli = parse(&["lookup", "Bruno Mars"]);
        assert!(matches!(
            cli.command,
            Some(CliCommand::Lookup { ref query }) if query == "Bruno Mars"
        ));
    }
}
