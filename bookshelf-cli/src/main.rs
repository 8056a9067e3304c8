//! Bookshelf CLI - Command-line interface for a personal book collection

mod commands;

use anyhow::Result;
use bookshelf_core::config::StoreConfig;
use bookshelf_core::CoverSize;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a scanned ISBN and add it to the collection
    Scan {
        /// ISBN-10 or ISBN-13, dashes allowed
        isbn: String,

        /// Add without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// List the books in the collection
    List {
        /// Only books whose title, author or ISBN match
        #[arg(short, long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display information about a book
    Show {
        /// Book id or ISBN
        book: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save a book's cover image
    Cover {
        /// Book id or ISBN
        book: String,

        /// Output file (a directory with --all)
        #[arg(short, long)]
        output: String,

        /// Cover size (S, M, L)
        #[arg(short, long, default_value = "M")]
        size: CoverSize,

        /// Save every cover of the book
        #[arg(long)]
        all: bool,
    },

    /// Add a book that has no library record
    AddLocal {
        /// Book title
        #[arg(short, long)]
        title: String,

        /// ISBN-10 or ISBN-13
        #[arg(long)]
        isbn: Option<String>,

        /// Cover image file
        #[arg(long)]
        cover: Option<String>,
    },

    /// Toggle a book's favorite mark
    Mark {
        /// Book id or ISBN
        book: String,
    },

    /// Replace a book's notes
    Note {
        /// Book id or ISBN
        book: String,

        /// Note text (empty clears the notes)
        text: String,
    },

    /// Record who a book is lent to
    Lend {
        /// Book id or ISBN
        book: String,

        /// Borrower; omit to mark the book returned
        #[arg(long)]
        to: Option<String>,
    },

    /// Remove a book from the collection
    Remove {
        /// Book id or ISBN
        book: String,
    },

    /// Shrink the cover cache
    PruneCache {
        /// Size limit in megabytes
        #[arg(long, default_value_t = StoreConfig::TEMPORARY_COVERS_MAX_BYTES / 1024 / 1024)]
        max_mb: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "bookshelf_cli=debug,bookshelf_core=debug"
    } else {
        "bookshelf_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let shelf = commands::Shelf::open();

    match cli.command {
        Commands::Scan { isbn, yes } => commands::scan(&shelf, &isbn, yes).await,

        Commands::List { search, json } => commands::list(&shelf, search.as_deref(), json).await,

        Commands::Show { book, json } => commands::show(&shelf, &book, json).await,

        Commands::Cover {
            book,
            output,
            size,
            all,
        } => commands::cover(&shelf, &book, &output, size, all).await,

        Commands::AddLocal { title, isbn, cover } => {
            commands::add_local(&shelf, &title, isbn.as_deref(), cover.as_deref()).await
        }

        Commands::Mark { book } => commands::mark(&shelf, &book).await,

        Commands::Note { book, text } => commands::note(&shelf, &book, &text).await,

        Commands::Lend { book, to } => commands::lend(&shelf, &book, to).await,

        Commands::Remove { book } => commands::remove(&shelf, &book).await,

        Commands::PruneCache { max_mb } => commands::prune_cache(&shelf, max_mb).await,
    }
}
