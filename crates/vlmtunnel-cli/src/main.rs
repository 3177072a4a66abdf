//! vlmtunnel CLI — play and inspect the VLM Tunnel quizzes.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use vlmtunnel_core::QuizKind;

mod commands;

#[derive(Parser)]
#[command(name = "vlmtunnel", version, about = "Visual reasoning quizzes against VLM benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one quiz interactively
    Play {
        /// Quiz to play: reid, scavenger, circuit
        #[arg(long, default_value = "reid")]
        quiz: QuizKind,

        /// Asset directory or base URL (overrides the config)
        #[arg(long)]
        source: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// RNG seed for reproducible example order
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many answers
        #[arg(long)]
        rounds: Option<u32>,
    },

    /// Show the published benchmark scores
    Benchmarks {
        /// Only show one quiz
        #[arg(long)]
        quiz: Option<QuizKind>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check the manifests (and with --deep, every metadata document)
    Validate {
        /// Asset directory or base URL (overrides the config)
        #[arg(long)]
        source: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also fetch and check every example's metadata
        #[arg(long)]
        deep: bool,
    },

    /// Load one example per quiz and write the page as static HTML
    Render {
        /// Output file
        #[arg(long, default_value = "vlmtunnel.html")]
        output: PathBuf,

        /// Asset directory or base URL (overrides the config)
        #[arg(long)]
        source: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// RNG seed for reproducible example choice
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Create a starter config and a demo dataset
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vlmtunnel=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            quiz,
            source,
            config,
            seed,
            rounds,
        } => commands::play::execute(quiz, source, config, seed, rounds).await,
        Commands::Benchmarks { quiz, format } => commands::benchmarks::execute(quiz, format),
        Commands::Validate {
            source,
            config,
            deep,
        } => commands::validate::execute(source, config, deep).await,
        Commands::Render {
            output,
            source,
            config,
            seed,
        } => commands::render::execute(output, source, config, seed).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
