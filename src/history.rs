use std::io::{self, Write as _};

use anyhow::{Context, Result};
use serde::Serialize;

use rankdrill::config::RankdrillConfig;
use rankdrill::format::OutputFormat;
use rankdrill::report;
use rankdrill_core::history::JsonFileStore;
use rankdrill_core::{HistoryEntry, HistoryStats, HistoryTracker};

#[derive(Serialize)]
struct HistoryReport<'a> {
    stats: &'a HistoryStats,
    entries: &'a [HistoryEntry],
}

fn tracker(config: &RankdrillConfig) -> HistoryTracker<JsonFileStore> {
    HistoryTracker::new(JsonFileStore::new(&config.history.path))
}

pub fn show(config: &RankdrillConfig, format: OutputFormat, recent: usize) -> Result<()> {
    let tracker = tracker(config);
    let entries = tracker.history().context("could not read history")?;
    let stats = rankdrill_core::history::compute_stats(&entries);

    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Text => report::write_stats(&mut out, &stats, &entries, recent)?,
        OutputFormat::Json => {
            let json = format.serialize(&HistoryReport {
                stats: &stats,
                entries: &entries,
            })?;
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

pub fn clear(config: &RankdrillConfig) -> Result<()> {
    tracker(config)
        .clear()
        .context("could not clear history")?;
    println!("History cleared.");
    Ok(())
}
