use anyhow::{bail, Context};
use biblio_app::modules::books::form::{FormState, SearchStatus};
use biblio_app::modules::books::presenter;
use biblio_app::modules::books::session::SearchUpdate;
use biblio_app::BookShelf;
use biblio_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "biblio", version, about = "Personal book shelf")]
struct Cli {
    /// Defaults to `serve`
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// List books, newest first
    List,
    /// Add a book
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        author: Option<String>,
        #[arg(short, long)]
        summary: Option<String>,
        #[arg(short, long)]
        comment: String,
        /// Whole stars, 1 to 5
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        #[arg(long)]
        cover_url: Option<String>,
        /// Fill a blank summary, author and cover from the metadata search
        #[arg(long)]
        lookup: bool,
    },
    /// Delete a book by id
    Delete { id: String },
    /// Search book metadata without saving anything
    Lookup {
        title: String,
        #[arg(short, long)]
        author: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let command = Cli::parse().command.unwrap_or(Command::Serve);

    let settings = Settings::load().with_context(|| "failed to load biblio settings")?;
    biblio_telemetry::init(&settings.telemetry);

    tracing::debug!(?command, "running command");
    if let Command::Serve = command {
        return biblio_app::serve(&settings).await;
    }

    let shelf = BookShelf::from_settings(&settings)?;
    match command {
        Command::Serve => Ok(()),
        Command::List => list(&shelf).await,
        Command::Add {
            title,
            author,
            summary,
            comment,
            rating,
            cover_url,
            lookup,
        } => {
            let form = FormState {
                title,
                author: author.unwrap_or_default(),
                summary: summary.unwrap_or_default(),
                comment,
                rating: Some(rating),
                cover_url: cover_url.unwrap_or_default(),
                form_id: String::new(),
            };
            add(&shelf, form, lookup).await
        }
        Command::Delete { id } => {
            shelf
                .store()
                .delete(&id)
                .await
                .with_context(|| format!("failed to delete book {id}"))?;
            println!("deleted {id}");
            Ok(())
        }
        Command::Lookup { title, author } => {
            let form = FormState {
                title,
                author: author.unwrap_or_default(),
                ..FormState::default()
            };
            lookup(&shelf, form).await
        }
    }
}

async fn list(shelf: &BookShelf) -> anyhow::Result<()> {
    let records = shelf.store().list().await.context("failed to load books")?;
    if records.is_empty() {
        println!("{}", presenter::EMPTY_SHELF);
        return Ok(());
    }

    for record in &records {
        let author = record.author.as_deref().unwrap_or("?");
        println!(
            "{}  {}  {} ({})  {}",
            record.id,
            presenter::stars(record.rating),
            record.title,
            author,
            record.date
        );
    }
    println!("{} livre(s)", records.len());
    Ok(())
}

async fn add(shelf: &BookShelf, mut form: FormState, with_lookup: bool) -> anyhow::Result<()> {
    if with_lookup {
        if let SearchUpdate::Applied { form: found, status } = shelf.search(form.clone()).await {
            println!("{}", status.message());
            form = found;
        }
    }

    let record = shelf.create(&form).await.context("failed to add book")?;
    println!("{} {}", record.id, record.title);
    Ok(())
}

async fn lookup(shelf: &BookShelf, form: FormState) -> anyhow::Result<()> {
    let SearchUpdate::Applied { form, status } = shelf.search(form).await else {
        bail!("search superseded");
    };

    match status {
        SearchStatus::Found => {
            println!("auteur     : {}", form.author);
            println!("couverture : {}", form.cover_url);
            println!("résumé     : {}", form.summary);
            Ok(())
        }
        other => bail!("{}", other.message()),
    }
}
