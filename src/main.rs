use clap::Parser;
use color_eyre::Result;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use fasta_suggest::cache::MemoryCache;
use fasta_suggest::command::{Command, parse_command};
use fasta_suggest::config::{self, Config};
use fasta_suggest::error::SuggestError;
use fasta_suggest::query::QueryCoordinator;
use fasta_suggest::sink::{ConsoleSink, OutputFormat};
use fasta_suggest::source::HttpSuggestionSource;

/// How often the event loop fires the debounce and polls the worker
const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Debounced taxon suggestions for FASTA search
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Debounced, cache-backed taxon suggestions for FASTA search"
)]
struct Args {
    /// Successive states of the input field (if not provided, reads lines from stdin)
    inputs: Vec<String>,

    /// Print settlements and selections as JSON lines
    #[arg(long)]
    json: bool,

    /// Configuration file (default: ~/.config/fasta-suggest/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Access credential for the suggestion service
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL of the suggestion service
    #[arg(long)]
    base_url: Option<String>,

    /// Log pipeline activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);
    color_eyre::install()?;

    let config_result = config::load_config(args.config.as_deref());
    if let Some(warning) = &config_result.warning {
        eprintln!("Warning: {}", warning);
    }
    let config = apply_overrides(config_result.config, &args);

    let mut coordinator = build_coordinator(&config)?;
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    coordinator.set_sink(Box::new(ConsoleSink::stdout(format)));

    let session = if args.inputs.is_empty() {
        run_interactive(&mut coordinator)
    } else {
        run_inputs(&mut coordinator, &args.inputs);
        Ok(())
    };

    coordinator.dispose();
    log::debug!("=== FASTA-SUGGEST SESSION ENDED ===");

    Ok(session?)
}

/// Writes to stderr at WARN level, DEBUG with `-v`; RUST_LOG wins over both
fn init_logging(verbose: bool) {
    use std::io::Write;

    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            use std::time::SystemTime;
            let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
            writeln!(
                buf,
                "[{}] [{}] {}",
                datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .init();

    log::debug!("=== FASTA-SUGGEST SESSION STARTED ===");
}

/// CLI flags take precedence over the config file
fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if let Some(base_url) = &args.base_url {
        config.remote.base_url = base_url.clone();
    }
    if let Some(api_key) = &args.api_key {
        config.remote.api_key = Some(api_key.clone());
    }
    config
}

/// Set up the source, cache and fetch worker thread
fn build_coordinator(config: &Config) -> Result<QueryCoordinator, SuggestError> {
    let source = HttpSuggestionSource::new(
        &config.remote.base_url,
        config.remote.api_key.clone(),
        Duration::from_secs(config.remote.timeout_secs),
    )?;
    let cache = MemoryCache::new(config.cache.capacity);

    Ok(QueryCoordinator::with_source(
        &config.suggest,
        Box::new(cache),
        Arc::new(source),
    ))
}

/// Feed positional inputs as keystrokes, then wait for the last one to settle
fn run_inputs(coordinator: &mut QueryCoordinator, inputs: &[String]) {
    for input in inputs {
        coordinator.on_input(input);
        coordinator.tick();
    }
    wait_settled(coordinator);
}

/// Each stdin line is a keystroke or a command, until `:quit` or EOF
fn run_interactive(coordinator: &mut QueryCoordinator) -> Result<(), SuggestError> {
    let (line_tx, line_rx) = mpsc::channel::<io::Result<String>>();

    // Reading stdin blocks, so it gets its own thread
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let failed = line.is_err();
            if line_tx.send(line).is_err() || failed {
                break;
            }
        }
    });

    loop {
        match line_rx.recv_timeout(TICK_INTERVAL) {
            Ok(Err(e)) => {
                log::error!("Failed to read stdin: {}", e);
                return Err(e.into());
            }
            Ok(Ok(line)) => match parse_command(&line) {
                Ok(Command::Input(text)) => coordinator.on_input(&text),
                Ok(Command::Select(index)) => {
                    // Piped input outruns the debounce; select from the settled list
                    wait_settled(coordinator);
                    if coordinator.select_index(index).is_none() {
                        eprintln!("No suggestion #{}", index + 1);
                    }
                }
                Ok(Command::Quit) => break,
                Err(e) => eprintln!("{}", e),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                wait_settled(coordinator);
                break;
            }
        }
        coordinator.tick();
    }

    Ok(())
}

/// Tick until no debounce is pending and no current lookup is outstanding
///
/// Terminates because every lookup resolves within the HTTP timeout or
/// settles through the fallback when the worker goes away.
fn wait_settled(coordinator: &mut QueryCoordinator) {
    while !coordinator.is_settled() {
        if !coordinator.tick() {
            std::thread::sleep(TICK_INTERVAL);
        }
    }
}
