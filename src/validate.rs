use std::path::PathBuf;

use anyhow::Result;

use rankdrill::config::RankdrillConfig;
use rankdrill::drill;

/// Load the catalog and print scenario counts per category.
pub fn run(config: &RankdrillConfig, catalog: Option<PathBuf>) -> Result<()> {
    let path = catalog.unwrap_or_else(|| config.catalog.path.clone());
    let catalog = drill::load_catalog(&path)?;

    println!(
        "[OK] {}: {} scenarios",
        path.display(),
        catalog.len()
    );
    for (category, count) in catalog.category_counts() {
        println!("  {category}: {count}");
    }
    Ok(())
}
