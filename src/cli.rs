use crate::history::HistoryStore;
use crate::model::{LookupConfig, SessionState};
use crate::orchestrator::{self, SessionController};
use crate::service::HttpReportFetcher;
use crate::storage::{self, FileStore};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "volatility-terminal",
    version,
    about = "Historical volatility lookups with a recent-symbol history"
)]
pub struct Cli {
    /// Symbol to look up (immediately on launch in the TUI; required with --json/--text)
    pub symbol: Option<String>,

    /// Base URL of the volatility service
    #[arg(long, default_value = "http://localhost:8000")]
    pub base_url: String,

    /// Years of price history the service should analyze
    #[arg(long, default_value_t = 5)]
    pub lookback_years: u32,

    /// Request timeout
    #[arg(long, default_value = "15s")]
    pub timeout: humantime::Duration,

    /// Print the report as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print a text summary and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Print recently viewed symbols and exit
    #[arg(long)]
    pub history: bool,

    /// Forget recently viewed symbols and exit
    #[arg(long)]
    pub clear_history: bool,

    /// Write each loaded report to this path as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Directory for history and logs (defaults to the platform data directory)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Abort an in-flight lookup when a newer one replaces it
    #[arg(long)]
    pub cancel_superseded: bool,
}

impl Cli {
    pub fn is_interactive(&self) -> bool {
        !(self.json || self.text || self.history || self.clear_history)
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if args.json && args.text {
        return Err(anyhow::anyhow!("--json and --text are mutually exclusive"));
    }
    if (args.json || args.text) && (args.history || args.clear_history) {
        return Err(anyhow::anyhow!(
            "--history/--clear-history cannot be combined with --json or --text"
        ));
    }

    let data_dir = match args.data_dir.clone() {
        Some(dir) => dir,
        None => storage::default_data_dir()?,
    };

    if args.is_interactive() {
        #[cfg(feature = "tui")]
        {
            match crate::logging::init_file(&data_dir) {
                Ok(path) => tracing::info!(path = %path.display(), "tui session started"),
                Err(e) => eprintln!("warning: file logging disabled: {e:#}"),
            }
        }
        #[cfg(not(feature = "tui"))]
        {
            crate::logging::init_stderr();
        }
    } else {
        crate::logging::init_stderr();
    }

    let store = FileStore::new(&data_dir);
    tracing::debug!(dir = %store.root().display(), "history store");
    let history = HistoryStore::open(Box::new(store));
    let session = SessionController::new(history);

    if args.history || args.clear_history {
        return run_history(&args, session);
    }

    if args.is_interactive() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args, session).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            if args.symbol.is_none() {
                return Err(anyhow::anyhow!(
                    "built without TUI support: pass a SYMBOL (and optionally --json)"
                ));
            }
            return run_lookup(&args, session).await;
        }
    }

    run_lookup(&args, session).await
}

/// Build a `LookupConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> LookupConfig {
    LookupConfig {
        base_url: args.base_url.clone(),
        lookback_years: args.lookback_years,
        timeout: Duration::from(args.timeout),
        user_agent: format!("volatility-terminal/{}", env!("CARGO_PKG_VERSION")),
    }
}

fn run_history(args: &Cli, mut session: SessionController) -> Result<()> {
    if args.clear_history {
        session.clear_history();
        eprintln!("History cleared");
    }
    if args.history {
        for line in history_lines(session.history()) {
            println!("{line}");
        }
    }
    Ok(())
}

fn history_lines(history: &HistoryStore) -> Vec<String> {
    if history.is_empty() {
        return vec!["No recent symbols".to_string()];
    }
    history
        .ranked()
        .map(|entry| format!("{:>2}  {}", entry.rank + 1, entry.symbol))
        .collect()
}

/// Look up one symbol and print it as JSON or text.
async fn run_lookup(args: &Cli, mut session: SessionController) -> Result<()> {
    let raw = args
        .symbol
        .as_deref()
        .context("a SYMBOL is required with --json or --text")?;
    let fetcher = HttpReportFetcher::new(&build_config(args))?;

    if orchestrator::lookup_once(&mut session, &fetcher, raw)
        .await
        .is_none()
    {
        return Err(anyhow::anyhow!("symbol cannot be empty"));
    }

    match session.state() {
        SessionState::Loaded { symbol, report } => {
            for info in
                orchestrator::process_lookup_completion(args.export_json.as_deref(), session.state())
            {
                eprintln!("{}", info.to_message());
            }
            if args.json {
                println!("{}", serde_json::to_string_pretty(report)?);
            } else {
                let summary = crate::text_summary::build_text_summary(symbol.as_str(), report);
                for line in summary.lines {
                    println!("{line}");
                }
            }
            Ok(())
        }
        SessionState::Failed { symbol, message } => Err(anyhow::anyhow!("{symbol}: {message}")),
        other => Err(anyhow::anyhow!("lookup did not settle: {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Cli::parse_from(["volatility-terminal"]);
        assert!(args.is_interactive());
        assert_eq!(args.symbol, None);
        let cfg = build_config(&args);
        assert_eq!(cfg.base_url, "http://localhost:8000");
        assert_eq!(cfg.lookback_years, 5);
        assert_eq!(cfg.timeout, Duration::from_secs(15));
        assert!(cfg.user_agent.starts_with("volatility-terminal/"));
    }

    #[test]
    fn one_shot_flags() {
        let args = Cli::parse_from([
            "volatility-terminal",
            "spy",
            "--json",
            "--timeout",
            "3s",
            "--cancel-superseded",
        ]);
        assert!(!args.is_interactive());
        assert_eq!(args.symbol.as_deref(), Some("spy"));
        assert!(args.cancel_superseded);
        assert_eq!(build_config(&args).timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn rejects_conflicting_output_modes() {
        let args = Cli::parse_from(["volatility-terminal", "spy", "--json", "--text"]);
        assert!(run(args).await.is_err());
    }

    #[test]
    fn history_listing_is_ranked() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = HistoryStore::open(Box::new(FileStore::new(dir.path())));
        assert_eq!(history_lines(&history), ["No recent symbols"]);

        history.record(&crate::symbol::Symbol::parse("aapl").unwrap());
        history.record(&crate::symbol::Symbol::parse("msft").unwrap());
        assert_eq!(history_lines(&history), [" 1  MSFT", " 2  AAPL"]);
    }

    #[tokio::test]
    async fn clear_history_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volatility_history.json");
        std::fs::write(&path, r#"["SPY"]"#).unwrap();
        let args = Cli::parse_from([
            "volatility-terminal",
            "--clear-history",
            "--data-dir",
            dir.path().to_str().unwrap(),
        ]);
        run(args).await.unwrap();
        assert!(!path.exists());
    }
}
