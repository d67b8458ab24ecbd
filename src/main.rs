//! Command-line entry point.
//!
//! # Subcommands
//!
//! - `browse` (default): interactive catalog browser on stdin/stdout
//! - `check`: one reachability probe against the backend
//! - `health`: calls every backend operation once and reports each result
//!
//! # Browse Commands
//!
//! One command per line:
//!
//! - `type <text>`: search box now holds `<text>` (debounced search)
//! - `clear`: empty the search box and show everything
//! - `search <text>`: search immediately
//! - `all`: show all products
//! - `category <id|all>`: filter by category
//! - `retry`: re-run the last failed query
//! - `show <id>`: open product detail
//! - `close`: back to the list
//! - `categories`: refetch category names
//! - `quit`

#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokotrends::api::health::{run_diagnostics, DiagnosticSample};
use tokotrends::api::Backend;
use tokotrends::domain::{CategoryId, ProductId};
use tokotrends::transport::HttpTransport;
use tokotrends::ui::render;
use tokotrends::{Config, SessionHandle, Theme, TrendsError};

#[derive(Parser)]
#[command(name = "tokotrends", version)]
#[command(about = "Browse marketplace products, reviews and review sentiment", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "TOKOTRENDS_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL, e.g. http://127.0.0.1:5000
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log filter directive (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    trace_level: Option<String>,

    /// Append finished spans to this file as JSON lines
    #[arg(long, global = true)]
    trace_file: Option<PathBuf>,

    /// Search-as-you-type quiescence window in milliseconds
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive catalog browser (default)
    Browse,

    /// Check that the backend answers
    Check,

    /// Call every backend endpoint once and report status, latency and size
    Health {
        /// Product id used for per-product endpoints
        #[arg(long, default_value_t = 1)]
        product: u64,

        /// Category id used for per-category endpoints
        #[arg(long, default_value_t = 1)]
        category: u64,

        /// Search text used for the name search endpoint
        #[arg(long, default_value = "jam")]
        search: String,
    },
}

impl Cli {
    fn overrides(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        if let Some(url) = &self.api_url {
            map.insert("api_url".to_string(), url.clone());
        }
        if let Some(level) = &self.trace_level {
            map.insert("trace_level".to_string(), level.clone());
        }
        if let Some(path) = &self.trace_file {
            map.insert("trace_file".to_string(), path.display().to_string());
        }
        if let Some(ms) = self.debounce_ms {
            map.insert("debounce_ms".to_string(), ms.to_string());
        }
        map
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("tokotrends: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the command ran but found the backend unhealthy.
async fn run(cli: Cli) -> Result<bool, TrendsError> {
    let config = Config::load(cli.config.as_deref(), &cli.overrides())?;

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => browse(&config).await.map(|()| true),
        Commands::Check => check(&config).await,
        Commands::Health {
            product,
            category,
            search,
        } => {
            let sample = DiagnosticSample {
                product: ProductId(product),
                category: CategoryId(category),
                search,
            };
            health(&config, &sample).await
        }
    }
}

fn backend(config: &Config) -> Result<(Backend, String), TrendsError> {
    let transport = HttpTransport::new(config)?;
    let base_url = transport.base_url().to_string();
    tokotrends::observability::init_tracing(config);
    Ok((Backend::new(Arc::new(transport)), base_url))
}

async fn check(config: &Config) -> Result<bool, TrendsError> {
    let (backend, base_url) = backend(config)?;
    match backend.health.probe().await {
        Ok(elapsed) => {
            println!("{base_url} is reachable ({}ms)", elapsed.as_millis());
            Ok(true)
        }
        Err(e) => {
            println!("{base_url} is not reachable: {e}");
            Ok(false)
        }
    }
}

async fn health(config: &Config, sample: &DiagnosticSample) -> Result<bool, TrendsError> {
    let (backend, base_url) = backend(config)?;
    println!("diagnostics for {base_url}\n");

    let reports = run_diagnostics(&backend, sample).await;
    for report in &reports {
        let detail = match &report.outcome {
            Ok(Some(count)) => format!("{count} records"),
            Ok(None) => "ok".to_string(),
            Err(e) => e.to_string(),
        };
        println!(
            "{} {:<22} {:>6}ms  {:<44} {detail}",
            if report.is_ok() { "✓" } else { "✗" },
            report.name,
            report.elapsed.as_millis(),
            report.target,
        );
    }

    let failed = reports.iter().filter(|r| !r.is_ok()).count();
    println!("\n{} of {} endpoints ok", reports.len() - failed, reports.len());
    Ok(failed == 0)
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Type(String),
    Clear,
    Search(String),
    All,
    Category(Option<CategoryId>),
    Retry,
    Show(ProductId),
    Close,
    Categories,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let id = |what: &str| {
        rest.parse::<u64>()
            .map_err(|_| format!("`{word}` expects a numeric {what} id, got `{rest}`"))
    };

    match word {
        "type" => Ok(Command::Type(rest.to_string())),
        "clear" => Ok(Command::Clear),
        "search" => Ok(Command::Search(rest.to_string())),
        "all" => Ok(Command::All),
        "category" if rest == "all" || rest.is_empty() => Ok(Command::Category(None)),
        "category" => id("category").map(|id| Command::Category(Some(CategoryId(id)))),
        "retry" => Ok(Command::Retry),
        "show" => id("product").map(|id| Command::Show(ProductId(id))),
        "close" => Ok(Command::Close),
        "categories" => Ok(Command::Categories),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "" => Err("type a command; `quit` exits".to_string()),
        other => Err(format!("unknown command `{other}`")),
    }
}

/// Sends `command` to the session. Returns `false` on quit.
fn dispatch(handle: &SessionHandle, command: Command) -> Result<bool, TrendsError> {
    match command {
        Command::Type(text) => handle.input_changed(text)?,
        Command::Clear => handle.input_cleared()?,
        Command::Search(text) => handle.search_by_text(text)?,
        Command::All => handle.load_all()?,
        Command::Category(category) => handle.filter_by_category(category)?,
        Command::Retry => handle.retry()?,
        Command::Show(id) => handle.select_product(id)?,
        Command::Close => handle.close_detail()?,
        Command::Categories => handle.refetch_categories()?,
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

async fn browse(config: &Config) -> Result<(), TrendsError> {
    let session = tokotrends::initialize(config)?;
    let handle = session.handle();
    let mut snapshots = handle.subscribe();
    let theme = Theme::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    handle.start()?;
    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let screen = render(&snapshots.borrow_and_update(), &theme);
                print!("\u{001b}[2J\u{001b}[H{screen}> ");
                std::io::stdout().flush()?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(command) => {
                        if !dispatch(&handle, command)? {
                            break;
                        }
                    }
                    Err(message) => eprintln!("{message}"),
                }
            }
        }
    }

    session.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("type jam tangan"), Ok(Command::Type("jam tangan".to_string())));
        assert_eq!(parse_command("  all "), Ok(Command::All));
        assert_eq!(parse_command("category 3"), Ok(Command::Category(Some(CategoryId(3)))));
        assert_eq!(parse_command("category all"), Ok(Command::Category(None)));
        assert_eq!(parse_command("show 12"), Ok(Command::Show(ProductId(12))));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_command("show abc").is_err());
        assert!(parse_command("dance").is_err());
        assert!(parse_command("").is_err());
    }

    #[test]
    fn test_cli_flags_become_overrides() {
        let cli = Cli::parse_from(["tokotrends", "--api-url", "http://127.0.0.1:5000", "--debounce-ms", "250", "check"]);
        let overrides = cli.overrides();
        assert_eq!(overrides["api_url"], "http://127.0.0.1:5000");
        assert_eq!(overrides["debounce_ms"], "250");
        assert!(matches!(cli.command, Some(Commands::Check)));
    }
}
