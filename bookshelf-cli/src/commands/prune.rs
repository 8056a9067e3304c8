//! Prune-cache command implementation

use super::Shelf;
use anyhow::Result;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Evict remote covers until the cache fits in `max_mb`
pub async fn prune_cache(shelf: &Shelf, max_mb: u64) -> Result<()> {
    let freed = shelf
        .covers
        .prune_temporary(max_mb.saturating_mul(BYTES_PER_MB))
        .await;
    println!(
        "Freed {:.1} MB from {}",
        freed as f64 / BYTES_PER_MB as f64,
        shelf.config.temporary_covers_dir().display()
    );
    Ok(())
}
