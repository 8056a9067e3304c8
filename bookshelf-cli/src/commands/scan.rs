//! Scan command implementation

use super::{describe, Shelf};
use anyhow::{bail, Result};
use bookshelf_core::{isbn, ScanPipeline, ScanState};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::time::Duration;

/// Look up a scanned ISBN and offer to add it
pub async fn scan(shelf: &Shelf, code: &str, yes: bool) -> Result<()> {
    let normalized = isbn::normalize(code);
    if !isbn::is_valid(&normalized) {
        tracing::warn!("{} has a bad check digit, looking it up anyway", code);
    }

    let source = shelf.source()?;
    let pipeline = ScanPipeline::new(source.clone(), shelf.library.clone());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.set_message(format!("Looking up {}", normalized));
    spinner.enable_steady_tick(Duration::from_millis(100));

    pipeline.scan(code);
    let state = pipeline.settled().await;
    spinner.finish_and_clear();

    match state {
        ScanState::AlreadyOwned { book } => {
            println!("Already in your collection: {}", describe(&book));
            pipeline.cancel();
        }
        ScanState::NewBookReady { book } => {
            println!("Found: {}", describe(&book));
            if let Some(published) = &book.publish_date {
                println!("Published: {}", published);
            }

            if !yes && !ask("Add to collection? [y/N] ")? {
                pipeline.cancel();
                println!("Not added");
                return Ok(());
            }

            match pipeline.confirm().await? {
                Some(added) => {
                    println!("Added \"{}\" as {}", added.title, added.id());
                    if let Err(e) = shelf.library.resolve_authors(added.id(), source.as_ref()).await {
                        tracing::warn!("Could not resolve authors: {}", e);
                    }
                }
                None => println!("Already in your collection"),
            }
        }
        ScanState::NotFound { isbn } => bail!("No book found for ISBN {}", isbn),
        ScanState::Failed { isbn, reason } => bail!("Lookup of {} failed: {}", isbn, reason),
        other => bail!("Scan ended in unexpected state {:?}", other),
    }

    Ok(())
}

fn ask(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
