//! Barcode scan intake
//!
//! A [`ScanPipeline`] turns scanned barcodes into candidate books. Its state is
//! published on a watch channel; every new event supersedes whatever lookup
//! or dismiss timer is still running, so only the latest scan can move the
//! state.

use crate::config::ScanConfig;
use crate::error::{LibraryError, LookupError};
use crate::finder::MetadataSource;
use crate::isbn;
use crate::library::{AddOutcome, Library};
use crate::types::Book;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};

/// Where a scan currently stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    /// The camera is reading a barcode
    Decoding,
    LookingUp {
        isbn: String,
    },
    /// The scanned edition is already in the collection
    AlreadyOwned {
        book: Book,
    },
    /// Lookup succeeded; waiting for confirmation
    NewBookReady {
        book: Book,
    },
    /// The remote has no record for the ISBN
    NotFound {
        isbn: String,
    },
    Failed {
        isbn: String,
        reason: String,
    },
}

impl ScanState {
    /// States that return to idle on their own
    pub fn auto_dismisses(&self) -> bool {
        matches!(self, ScanState::NotFound { .. } | ScanState::Failed { .. })
    }

    /// Whether a lookup is still running
    pub fn is_pending(&self) -> bool {
        matches!(self, ScanState::LookingUp { .. })
    }
}

struct Progress {
    generation: u64,
    task: Option<AbortHandle>,
}

struct Shared {
    state: watch::Sender<ScanState>,
    progress: Mutex<Progress>,
}

impl Shared {
    fn progress(&self) -> std::sync::MutexGuard<'_, Progress> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Supersede any running work and publish `state`. Returns the new generation.
    fn begin(&self, state: ScanState) -> u64 {
        let mut progress = self.progress();
        if let Some(task) = progress.task.take() {
            task.abort();
        }
        progress.generation += 1;
        self.state.send_replace(state);
        progress.generation
    }

    /// Publish `state` only if no newer event happened since `generation`
    fn publish(&self, generation: u64, state: ScanState) -> bool {
        let progress = self.progress();
        if progress.generation != generation {
            return false;
        }
        self.state.send_replace(state);
        true
    }

    /// Take the ready book, superseding any running work. Returns the new
    /// generation with the book.
    fn claim_ready(&self) -> Option<(u64, Book)> {
        let mut progress = self.progress();
        let book = match &*self.state.borrow() {
            ScanState::NewBookReady { book } => book.clone(),
            _ => return None,
        };
        if let Some(task) = progress.task.take() {
            task.abort();
        }
        progress.generation += 1;
        Some((progress.generation, book))
    }

    fn track(&self, generation: u64, task: AbortHandle) {
        let mut progress = self.progress();
        if progress.generation == generation {
            progress.task = Some(task);
        } else {
            task.abort();
        }
    }
}

/// Scan intake state machine
pub struct ScanPipeline {
    source: Arc<dyn MetadataSource>,
    library: Arc<Library>,
    shared: Arc<Shared>,
    dismiss_delay: Duration,
}

impl ScanPipeline {
    pub fn new(source: Arc<dyn MetadataSource>, library: Arc<Library>) -> Self {
        let (state, _) = watch::channel(ScanState::Idle);
        Self {
            source,
            library,
            shared: Arc::new(Shared {
                state,
                progress: Mutex::new(Progress {
                    generation: 0,
                    task: None,
                }),
            }),
            dismiss_delay: ScanConfig::DISMISS_DELAY,
        }
    }

    /// How long not-found and failed results stay visible
    pub fn with_dismiss_delay(mut self, delay: Duration) -> Self {
        self.dismiss_delay = delay;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> ScanState {
        self.shared.state.borrow().clone()
    }

    /// The camera started reading a barcode
    pub fn start_decoding(&self) {
        self.shared.begin(ScanState::Decoding);
    }

    /// A barcode was read. Starts a lookup in the background; must be called
    /// within a Tokio runtime.
    pub fn scan(&self, code: &str) {
        let isbn = isbn::normalize(code);
        let generation = self.shared.begin(ScanState::LookingUp { isbn: isbn.clone() });
        debug!("Scan #{} started for {}", generation, isbn);

        let source = self.source.clone();
        let library = self.library.clone();
        let shared = self.shared.clone();
        let delay = self.dismiss_delay;

        let task = tokio::spawn(async move {
            let result = lookup(source.as_ref(), &library, isbn).await;
            let dismiss = result.auto_dismisses();
            if !shared.publish(generation, result) || !dismiss {
                return;
            }
            tokio::time::sleep(delay).await;
            shared.publish(generation, ScanState::Idle);
        });
        self.shared.track(generation, task.abort_handle());
    }

    /// Wait until no lookup is running and return the state
    pub async fn settled(&self) -> ScanState {
        let mut receiver = self.subscribe();
        let settled = match receiver.wait_for(|state| !state.is_pending()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    /// Add the ready book to the collection and return to idle.
    /// Returns the added book, or `None` when there was nothing to confirm.
    pub async fn confirm(&self) -> Result<Option<Book>, LibraryError> {
        let Some((generation, book)) = self.shared.claim_ready() else {
            return Ok(None);
        };

        let outcome = self.library.add(book.clone()).await;
        self.shared.publish(generation, ScanState::Idle);

        match outcome? {
            AddOutcome::Added => {
                info!("Scanned book \"{}\" added", book.title);
                Ok(Some(book))
            }
            AddOutcome::AlreadyOwned(owned) => {
                info!("\"{}\" was added in the meantime", owned.title);
                Ok(None)
            }
        }
    }

    /// Abandon the current scan
    pub fn cancel(&self) {
        self.shared.begin(ScanState::Idle);
    }
}

impl Drop for ScanPipeline {
    fn drop(&mut self) {
        if let Some(task) = self.shared.progress().task.take() {
            task.abort();
        }
    }
}

async fn lookup(source: &dyn MetadataSource, library: &Library, isbn: String) -> ScanState {
    if isbn.is_empty() {
        return ScanState::Failed {
            isbn,
            reason: "barcode is empty".to_string(),
        };
    }
    if !isbn::is_well_formed(&isbn) {
        warn!("Ignoring barcode {}: not an ISBN", isbn);
        return ScanState::Failed {
            isbn,
            reason: "barcode is not an ISBN".to_string(),
        };
    }

    if let Some(book) = library.find_by_isbn(&isbn).await {
        debug!("{} is already owned", isbn);
        return ScanState::AlreadyOwned { book };
    }

    match source.lookup_by_isbn(&isbn).await {
        Ok(book) => match library.find_duplicate(&book).await {
            // Scanned one ISBN form, own the edition under the other
            Some(owned) => ScanState::AlreadyOwned { book: owned },
            None => ScanState::NewBookReady { book },
        },
        Err(LookupError::NotFound(_)) => {
            info!("No record for {}", isbn);
            ScanState::NotFound { isbn }
        }
        Err(e @ LookupError::Decode(_)) => {
            error!("Lookup of {} failed: {}", isbn, e);
            ScanState::Failed {
                isbn,
                reason: e.to_string(),
            }
        }
        Err(e) => {
            warn!("Lookup of {} failed: {}", isbn, e);
            ScanState::Failed {
                isbn,
                reason: e.to_string(),
            }
        }
    }
}
