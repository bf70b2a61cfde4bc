use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use library_db_tools::{
    available, format_issued_at, issued, search, BookRecord, CatalogStore, Category, Export,
    NewBook, Statistics,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const RECENT_BOOKS: usize = 5;

#[derive(Debug, Parser)]
#[command(name = "library-db", version, about = "Track book lending in a local SQLite catalog")]
struct Cli {
    /// Catalog file, created on first use.
    #[arg(long, env = "LIBRARY_DB_PATH", default_value = "library.db", global = true)]
    db: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusFilter {
    Available,
    Issued,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Totals, per-category counts and the most recently added books.
    Dashboard,
    /// Add a new book. It starts out available.
    Add {
        id: String,
        title: String,
        #[arg(long)]
        author: Option<String>,
        /// Engineering, Fiction, Science, History, Business, or any other name.
        #[arg(long, default_value = "Engineering")]
        category: String,
    },
    /// Lend an available book, stamped with the current local time.
    Issue { id: String, borrower: String },
    /// Take an issued book back.
    Return { id: String },
    /// List books, optionally only those with the given status.
    List {
        #[arg(long, value_enum)]
        status: Option<StatusFilter>,
    },
    /// Case-insensitive search across every field.
    Search { query: Option<String> },
    /// Remove a book permanently, whatever its status.
    Delete { id: String },
    /// Write the whole catalog to a file, or stdout when no path is given.
    Export {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let cli = Cli::parse();
    let mut store = CatalogStore::open(&cli.db)
        .with_context(|| format!("failed to open catalog at {}", cli.db.display()))?;

    match cli.command {
        Command::Dashboard => {
            let books = store.list_all()?;
            if books.is_empty() {
                println!("Library is empty. Use `library-db add` to start.");
                return Ok(());
            }
            let summary = books.summary();
            println!("Total books:   {}", summary.total);
            println!("Books issued:  {}", summary.issued);
            println!("Available now: {}", summary.available);
            println!();
            for (category, count) in books.by_category() {
                println!("{:<14} {}", category, count);
            }
            println!();
            println!("Recently added:");
            print!("{}", render(books.recent(RECENT_BOOKS), cli.format)?);
        }
        Command::Add {
            id,
            title,
            author,
            category,
        } => {
            let mut book = NewBook::new(id, title, Category::from(category));
            if let Some(author) = author {
                book = book.with_author(author);
            }
            store.create(&book)?;
            println!("Added '{}' as {}", book.title, book.id);
        }
        Command::Issue { id, borrower } => {
            let issued_at = store.issue(&id, &borrower, Local::now().naive_local())?;
            println!("Issued {} on {}", label(&store, &id)?, format_issued_at(&issued_at));
        }
        Command::Return { id } => {
            store.return_book(&id)?;
            println!("Returned {}", label(&store, &id)?);
        }
        Command::List { status } => {
            let books = store.list_all()?;
            let books = match status {
                None => books,
                Some(StatusFilter::Available) => owned(available(&books)),
                Some(StatusFilter::Issued) => owned(issued(&books)),
            };
            print!("{}", render(&books, cli.format)?);
        }
        Command::Search { query } => {
            let books = store.list_all()?;
            let found = owned(search(&books, query.as_deref().unwrap_or("")));
            print!("{}", render(&found, cli.format)?);
        }
        Command::Delete { id } => {
            store.delete(&id)?;
            println!("Deleted {}", id);
        }
        Command::Export { output } => {
            let text = render(&store.list_all()?, cli.format)?;
            match output {
                Some(path) => std::fs::write(&path, text)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{}", text),
            }
        }
    }
    Ok(())
}

fn label(store: &CatalogStore, id: &str) -> anyhow::Result<String> {
    let book = store
        .get(id)?
        .with_context(|| format!("book {} vanished after update", id))?;
    Ok(book.display_label())
}

fn owned(books: Vec<&BookRecord>) -> Vec<BookRecord> {
    books.into_iter().cloned().collect()
}

fn render(books: &[BookRecord], format: OutputFormat) -> anyhow::Result<String> {
    let text = match format {
        OutputFormat::Table => books.to_md()?,
        OutputFormat::Csv => books.to_csv()?,
        OutputFormat::Json => format!("{}\n", books.to_json()?),
    };
    Ok(text)
}
