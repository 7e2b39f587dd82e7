use std::io::{self, Write as _};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use clap::Args;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rankdrill::config::RankdrillConfig;
use rankdrill::drill;
use rankdrill_core::history::JsonFileStore;
use rankdrill_core::{HistoryTracker, TestSession};

#[derive(Args)]
pub struct TakeArgs {
    /// Number of questions (overrides config)
    #[arg(long)]
    pub count: Option<usize>,

    /// RNG seed for a reproducible test (overrides config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Catalog file (overrides config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Do not record the result in history
    #[arg(long)]
    pub no_save: bool,
}

pub fn run(config: &RankdrillConfig, args: &TakeArgs) -> Result<()> {
    let count = args.count.unwrap_or(config.test.question_count);
    if count == 0 {
        bail!("--count must be at least 1");
    }
    let path = args.catalog.as_ref().unwrap_or(&config.catalog.path);
    let catalog = drill::load_catalog(path)?;
    if catalog.is_empty() {
        bail!("catalog {} has no scenarios", path.display());
    }

    let mut rng = args
        .seed
        .or(config.test.seed)
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    let session = TestSession::start(catalog.scenarios(), count, &mut rng)
        .context("could not prepare the test")?;
    if session.len() < count {
        println!(
            "Catalog has {} scenarios; the test will have {} questions.",
            catalog.len(),
            session.len()
        );
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    let Some(summary) = drill::run(session, &mut input, &mut out, unix_now)? else {
        writeln!(out, "\nTest abandoned; nothing recorded.")?;
        return Ok(());
    };

    if args.no_save {
        writeln!(out, "\nResult not saved (--no-save).")?;
        return Ok(());
    }
    let store = JsonFileStore::new(&config.history.path);
    let mut tracker =
        HistoryTracker::new(store).with_excerpt_chars(config.history.scenario_excerpt_chars);
    let outcome = tracker.record(&summary);
    if let Some(e) = &outcome.error {
        writeln!(out, "\nWarning: result not saved: {e}")?;
        return Ok(());
    }
    writeln!(
        out,
        "\nResult saved to {}.",
        tracker.store().path().display()
    )?;
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
