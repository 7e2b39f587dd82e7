use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use rankdrill::config::{DEFAULT_CONFIG_FILE, RankdrillConfig};
use rankdrill::format::OutputFormat;
use rankdrill::telemetry;

mod history;
mod take;
mod validate;

const CONFIG_HELP: &str = "\
CONFIGURATION:

  Settings are read from ./rankdrill.toml when present:

  [catalog]
  path = \"scenarios.json\"

  [test]
  question_count = 10
  seed = 1234            # optional, replays the same test

  [history]
  path = \".rankdrill/history.json\"
  scenario_excerpt_chars = 100

LOGGING:

  RANKDRILL_LOG=stderr writes JSON events to stderr, filtered by RUST_LOG.";

/// Situational-judgment ranking drills
///
/// Each question describes a workplace scenario and five possible responses.
/// Rank the responses from most to least appropriate; every option earns up
/// to 4 points depending on how close your rank is to the ideal one.
///
/// QUICK START:
///
///   rankdrill validate --catalog scenarios.json
///   rankdrill take --count 10
///   rankdrill history
#[derive(Parser)]
#[command(name = "rankdrill")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(after_help = "See 'rankdrill <command> --help' for more information on a specific command.")]
#[command(after_long_help = CONFIG_HELP)]
struct Cli {
    /// Config file
    #[arg(long, global = true, env = "RANKDRILL_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a test
    ///
    /// Questions are drawn evenly across categories and each question's
    /// options are shuffled. Answer with the option numbers from best to
    /// worst, e.g. "3 1 4 2 5". Enter q to abandon the test.
    Take(take::TakeArgs),

    /// Show past results and trends
    History {
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Recent attempts to list (text output)
        #[arg(long, default_value_t = 10)]
        recent: usize,
    },

    /// Delete all stored results
    #[command(name = "clear-history")]
    ClearHistory,

    /// Check a scenario catalog and count scenarios per category
    Validate {
        /// Catalog file (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let _telemetry = telemetry::init();
    let cli = Cli::parse();

    let config = RankdrillConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    match cli.command {
        Commands::Take(args) => take::run(&config, &args),
        Commands::History { format, recent } => history::show(&config, format, recent),
        Commands::ClearHistory => history::clear(&config),
        Commands::Validate { catalog } => validate::run(&config, catalog),
    }
}
