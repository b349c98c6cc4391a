//! Study Buddy CLI
//!
//! Terminal front end and HTTP server for Study Buddy sessions.

mod play;
mod render;

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use study_engine::{
    create_router, today, AppState, CatalogResolver, Config, FileProgressStore, ProgressStore,
    StudySession, PRESET_TOPICS,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Study Buddy - Topic Summaries and Quizzes
///
/// Turns a topic into a short summary, key points, and a multiple-choice
/// quiz, and counts how many topics you practiced today.
#[derive(Parser, Debug)]
#[command(name = "study")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: study.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Study interactively in the terminal
    Play {
        /// Topic to start with
        #[arg(value_name = "TOPIC")]
        topic: Option<String>,
    },

    /// Serve the HTTP API until Ctrl+C
    Serve {
        /// Port for the HTTP API server (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List preset topics
    Topics,

    /// Show how many topics were practiced today
    Progress,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tracing::debug!(config = ?args.config, "Config file");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Play { topic } => run_play(&config, topic.as_deref()),
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            config.validate()?;
            run_server(config).await
        }
        Command::Topics => {
            for (i, topic) in PRESET_TOPICS.iter().enumerate() {
                println!("{}. {topic}", i + 1);
            }
            Ok(())
        }
        Command::Progress => {
            let store = FileProgressStore::new(&config.progress_file);
            let date = today();
            let count = store.practiced_on(date).map_err(|e| {
                anyhow::anyhow!(
                    "{e}\n\nSuggestion: Check '{}' or delete it to start counting again",
                    config.progress_file
                )
            })?;
            println!("{date}: {}", render::render_practiced(count));
            Ok(())
        }
    }
}

/// Runs the interactive loop on stdin/stdout.
fn run_play(config: &Config, topic: Option<&str>) -> anyhow::Result<()> {
    let mut session = StudySession::new(
        CatalogResolver,
        FileProgressStore::new(&config.progress_file),
        config.theme,
    );

    if let Err(e) = session.load_practice_count(today()) {
        tracing::warn!(error = %e, "Could not read practice counter");
        println!("Warning: {e}");
    }

    if let Some(topic) = topic {
        let text = play::execute(&mut session, play::Command::Topic(topic.to_string()));
        println!("{}", text.trim_end());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    play::run(&mut session, stdin.lock(), &mut stdout)?;
    Ok(())
}

/// Serves the HTTP API until Ctrl+C.
async fn run_server(config: Config) -> anyhow::Result<()> {
    let host: IpAddr = config.host.parse()?;
    let addr = SocketAddr::new(host, config.port);

    println!("Configuration loaded:");
    println!("  Progress file: {}", config.progress_file);
    println!("  Theme: {}", config.theme);

    let state = AppState::new(config);
    {
        let mut session = state.session.lock().await;
        if let Err(e) = session.load_practice_count(today()) {
            tracing::warn!(error = %e, "Could not read practice counter");
        }
    }
    let router = create_router(state);

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {addr}: {e}\n\nSuggestion: Try a different port with --port"
        )
    })?;

    println!("HTTP API server running on http://{addr}");
    println!("Press Ctrl+C to stop");
    tracing::info!(%addr, "Server started");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
    }
    tracing::info!("Received Ctrl+C, shutting down");
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}
