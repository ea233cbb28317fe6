use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use fastrace::collector::Config as FastraceConfig;
use fastrace::prelude::*;
use rota_config::{get_config_path, get_log_dir, Config};
use rota_ledger::{LedgerWriter, LmdbLedger, Recorder};
use rota_output::format_ledger_entries;
use rota_registry::{Administrator, IdentityRegistry};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod console;
mod profiling;
mod session;

use console::Console;
use profiling::LogReporter;
use session::Session;

const MAIN_HELP: &str = r#"Rota is a console travel reservation manager.

Customers create an account, log in, and create, view, edit and delete their
own reservations. Administrators (configured in the config file) can change a
customer's personal data, look at any customer's reservations and delete
customer accounts.

Every new account and reservation is also appended to a ledger on disk. The
ledger is write-only from the console; use `rota ledger` to read it back.

Run without a command to start the interactive console."#;

#[derive(Parser)]
#[command(name = "rota")]
#[command(about = MAIN_HELP)]
#[command(version)]
struct Cli {
    #[arg(long, global = true, env = "ROTA_CONFIG", help = "Config file to use")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Do not record anything on the ledger")]
    no_ledger: bool,

    #[arg(long, global = true, help = "Log per-function timings to the log file")]
    profile: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start the interactive console (default).")]
    Shell,

    #[command(about = "Print config file location and contents.")]
    Config {
        #[arg(long, help = "Write the default config if the file does not exist")]
        init: bool,
    },

    #[command(about = "Print every account and reservation recorded on the ledger.")]
    Ledger {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(get_config_path);

    match cli.command {
        Some(Commands::Config { init }) => handle_config(&config_path, init),
        Some(Commands::Ledger { json }) => {
            let config = Config::load_from(&config_path)?;
            handle_ledger(&config, json)
        }
        Some(Commands::Shell) | None => {
            let config = Config::load_from(&config_path)?;
            init_logging(&config)?;
            run_shell(config, cli.no_ledger, cli.profile).await
        }
    }
}

fn init_logging(config: &Config) -> Result<()> {
    let log_dir = get_log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("rota.log"))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    Ok(())
}

async fn run_shell(config: Config, no_ledger: bool, profile: bool) -> Result<()> {
    let registry = IdentityRegistry::with_administrators(
        config
            .administrator_profiles()
            .into_iter()
            .map(Administrator::new),
    );

    if profile {
        fastrace::set_reporter(LogReporter, FastraceConfig::default());
    }

    let (recorder, writer) = start_ledger(&config, no_ledger);

    info!("Starting rota console");
    let outcome = tokio::task::spawn_blocking(move || -> Result<IdentityRegistry> {
        let root = if profile {
            Span::root("session", SpanContext::random())
        } else {
            Span::noop()
        };
        let _guard = root.set_local_parent();

        let stdin = std::io::stdin();
        let console = Console::new(stdin.lock(), std::io::stdout());
        let mut session = Session::new(registry, recorder, console);
        session.run()?;
        let (registry, _recorder, _console) = session.into_parts();
        Ok(registry)
    })
    .await;

    // The recorder is gone with the session, so the writer drains and stops.
    // Awaited before a session error is returned.
    if let Some(writer) = writer {
        match writer.await {
            Ok(written) => info!("Ledger flushed, {} entries this run", written),
            Err(e) => warn!("Ledger writer failed: {}", e),
        }
    }

    if profile {
        fastrace::flush();
    }

    let registry = outcome.map_err(|e| anyhow!("Console task failed: {}", e))??;
    info!(
        "Session ended with {} customer(s) registered",
        registry.customers().count()
    );
    Ok(())
}

fn start_ledger(
    config: &Config,
    no_ledger: bool,
) -> (Recorder, Option<tokio::task::JoinHandle<usize>>) {
    if no_ledger || !config.ledger.enabled {
        info!("Ledger disabled");
        return (Recorder::disabled(), None);
    }

    let path = config.ledger.resolved_path();
    match LmdbLedger::open(&path, config.ledger.map_size) {
        Ok(ledger) => {
            info!("Recording to ledger at {}", path.display());
            let (writer, recorder) = LedgerWriter::new(ledger);
            (recorder, Some(writer.spawn()))
        }
        Err(e) => {
            warn!("Could not open ledger at {}: {}", path.display(), e);
            eprintln!(
                "Warning: ledger at {} is unavailable, nothing will be recorded ({})",
                path.display(),
                e
            );
            (Recorder::disabled(), None)
        }
    }
}

fn handle_config(config_path: &Path, init: bool) -> Result<()> {
    if init && !config_path.exists() {
        Config::default().save_to(config_path)?;
        println!("Wrote default config");
    }

    println!("Config file: {}", config_path.display());
    println!();

    if config_path.exists() {
        println!("{}", std::fs::read_to_string(config_path)?);
    } else {
        println!("(file does not exist, using defaults)");
    }
    Ok(())
}

fn handle_ledger(config: &Config, json: bool) -> Result<()> {
    let path = config.ledger.resolved_path();
    if !path.exists() {
        println!("No ledger at {}", path.display());
        return Ok(());
    }

    let ledger = LmdbLedger::open(&path, config.ledger.map_size)
        .with_context(|| format!("opening ledger at {}", path.display()))?;
    let entries = ledger.entries()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{}", format_ledger_entries(&entries));
    }
    Ok(())
}
