//! Run the relation lookups against a live database and print the results.
//!
//! Usage: query_samples [AUTHOR_NAME] [LIBRARY_NAME]

use relationship_app::{
    config::AppConfig, connect_database, logging, repository::Repository,
    services::queries::QueryService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;
    logging::init(&config.logging);

    let mut args = std::env::args().skip(1);
    let author = args.next().unwrap_or_else(|| "J.K. Rowling".to_string());
    let library = args.next().unwrap_or_else(|| "Central Library".to_string());

    let pool = connect_database(&config.database).await?;
    let queries = QueryService::new(Repository::new(pool));

    match queries.books_by_author(&author).await? {
        Some(books) => {
            println!("Books by {}:", author);
            for book in books {
                println!("- {}", book);
            }
        }
        None => println!("Author not found."),
    }

    match queries.library_books(&library).await? {
        Some(books) => {
            println!("\nBooks in {}:", library);
            for book in books {
                println!("- {}", book);
            }
        }
        None => println!("\nLibrary not found."),
    }

    match queries.library_librarian(&library).await? {
        Some(librarian) => println!("\nLibrarian for {}: {}", library, librarian),
        None => println!("\nNo librarian found for this library."),
    }

    Ok(())
}
