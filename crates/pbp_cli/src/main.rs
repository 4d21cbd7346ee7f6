//! `pbp` command-line tool
//!
//! Reads play-by-play event files and prints box scores, play logs,
//! ingest reports or the ingested games as JSON.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "pbp")]
#[command(about = "Read play-by-play event files", long_about = None)]
struct Cli {
    /// Log filter, e.g. "warn" or "pbp_core=debug"
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// YAML ingest config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Print batting box scores
    BoxScore {
        /// Event file path
        file: PathBuf,

        /// Only this game id
        #[arg(long)]
        game: Option<String>,
    },

    /// Print every play with its description
    Plays {
        /// Event file path
        file: PathBuf,

        /// Only this game id
        #[arg(long)]
        game: Option<String>,
    },

    /// Report unparsed plays and aborted games; exits non-zero if any
    Check {
        /// Event file path
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Dump the ingested games as JSON
    Json {
        /// Event file path
        file: PathBuf,

        /// Output JSON file path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    pbp_cli::init_tracing(&cli.log_level)?;
    let config = cli.config.as_deref();

    match cli.command {
        Commands::BoxScore { file, game } => {
            let logs = pbp_cli::load_logs(&file, config)?;
            for game in pbp_cli::select_games(&logs, game.as_deref())? {
                println!("{}", pbp_cli::render_box_score(game));
            }
        }

        Commands::Plays { file, game } => {
            let logs = pbp_cli::load_logs(&file, config)?;
            for game in pbp_cli::select_games(&logs, game.as_deref())? {
                println!("{}", pbp_cli::render_play_log(game));
            }
        }

        Commands::Check { file, json } => {
            let logs = pbp_cli::load_logs(&file, config)?;
            let report = pbp_cli::check_report(&logs);
            if json {
                println!("{}", pbp_cli::to_json(&report)?);
            } else {
                print!("{}", report.render());
            }
            if !report.is_clean() {
                std::process::exit(1);
            }
        }

        Commands::Json { file, out } => {
            let logs = pbp_cli::load_logs(&file, config)?;
            match out {
                Some(path) => {
                    pbp_cli::write_json(&path, &logs)?;
                    eprintln!("Wrote {} games to {}", logs.games().len(), path.display());
                }
                None => println!("{}", pbp_cli::to_json(&logs)?),
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("pbp CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
