// # schemawatchd - Schema Watch Job
//
// Thin integration binary for the schemawatch system. One process run is one
// watch cycle; the invocation cadence (cron, a systemd timer, CI) lives
// outside. No business logic here: everything interesting happens in
// schemawatch-core.
//
// The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Building the transport, diff tool, and metadata store
// 4. Running one engine cycle and mapping the outcome to an exit code
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `SCHEMAWATCH_URL`: URL of the schema document to watch (required)
// - `SCHEMAWATCH_ROOT`: Root directory for data/, diffs/, and logs/
//   (default: current directory)
// - `SCHEMAWATCH_DIFF_COMMAND`: Diff command line, shell-style quoting
//   (default: "diff -u"). The two snapshot paths are appended.
// - `SCHEMAWATCH_HTTP_TIMEOUT_SECS`: Fetch timeout in seconds (default: 30)
// - `SCHEMAWATCH_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Exit Codes
//
// - 0: not-modified, unchanged, or saved
// - 1: transport failure, fatal write failure, or configuration error
//
// ## Example
//
// ```bash
// export SCHEMAWATCH_URL=https://docs.example.com/openapi.json
// export SCHEMAWATCH_ROOT=/var/lib/schemawatch
//
// schemawatchd
// ```

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use schemawatch_core::{
    DiffCommandConfig, FetchConfig, FileMetaStore, RunOutcome, WatchConfig, WatchEngine,
};
use schemawatch_core::state::file::META_FILE_NAME;
use schemawatch_diff_cli::CliDiffTool;
use schemawatch_fetch_http::HttpSchemaFetcher;

/// Exit codes for the two termination classes
///
/// Every successful verdict (including "nothing changed") exits 0; any
/// surfaced failure exits 1.
#[derive(Debug, Clone, Copy)]
enum WatchExitCode {
    /// Run reached a successful terminal verdict
    Success = 0,
    /// Transport failure, fatal write failure, or bad configuration
    Failure = 1,
}

impl From<WatchExitCode> for ExitCode {
    fn from(code: WatchExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    url: String,
    root: PathBuf,
    diff_command: String,
    http_timeout_secs: u64,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let url = env::var("SCHEMAWATCH_URL").map_err(|_| {
            anyhow::anyhow!(
                "SCHEMAWATCH_URL is required. \
                Set it via: export SCHEMAWATCH_URL=https://example.com/openapi.json"
            )
        })?;

        Ok(Self {
            url,
            root: env::var("SCHEMAWATCH_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            diff_command: env::var("SCHEMAWATCH_DIFF_COMMAND")
                .unwrap_or_else(|_| "diff -u".to_string()),
            http_timeout_secs: env::var("SCHEMAWATCH_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            log_level: env::var("SCHEMAWATCH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            anyhow::bail!(
                "SCHEMAWATCH_URL must use HTTP or HTTPS scheme. Got: {}",
                self.url
            );
        }

        if !(1..=300).contains(&self.http_timeout_secs) {
            anyhow::bail!(
                "SCHEMAWATCH_HTTP_TIMEOUT_SECS must be between 1 and 300. Got: {}",
                self.http_timeout_secs
            );
        }

        let words = shell_words::split(&self.diff_command)
            .map_err(|e| anyhow::anyhow!("SCHEMAWATCH_DIFF_COMMAND is not parseable: {}", e))?;
        if words.is_empty() {
            anyhow::bail!("SCHEMAWATCH_DIFF_COMMAND cannot be empty");
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "SCHEMAWATCH_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Diff command split into program and leading arguments
    fn diff_command_config(&self) -> Result<DiffCommandConfig> {
        let mut words = shell_words::split(&self.diff_command)?;
        let program = words.remove(0);
        Ok(DiffCommandConfig {
            program,
            args: words,
        })
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return WatchExitCode::Failure.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return WatchExitCode::Failure.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return WatchExitCode::Failure.into();
    }

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return WatchExitCode::Failure.into();
        }
    };

    let result = rt.block_on(async {
        match run_watch(config).await {
            Ok(outcome) => {
                info!("Run finished: {}", outcome.tag());
                WatchExitCode::Success
            }
            Err(e) => {
                error!("Run failed: {}", e);
                WatchExitCode::Failure
            }
        }
    });

    result.into()
}

/// Build the collaborators and run one watch cycle
async fn run_watch(config: Config) -> Result<RunOutcome> {
    info!("Starting schemawatchd");
    info!("Watching {}", config.url);

    let watch_config = WatchConfig::new(&config.url).rooted_at(&config.root);

    let fetcher = HttpSchemaFetcher::new(&FetchConfig {
        timeout_secs: config.http_timeout_secs,
    })?;

    let diff_tool = CliDiffTool::new(&config.diff_command_config()?)?;

    let meta_store = FileMetaStore::new(watch_config.data_dir.join(META_FILE_NAME)).await?;

    let engine = WatchEngine::new(
        Box::new(fetcher),
        Box::new(diff_tool),
        Box::new(meta_store),
        watch_config,
    )?;

    let outcome = engine.run_once().await?;

    if let RunOutcome::Saved { snapshot, .. } = &outcome {
        info!("New snapshot archived: {}", snapshot);
    }

    Ok(outcome)
}
