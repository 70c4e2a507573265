use crate::books::repository::BookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::books::repository::pg_book_repository::PgBookRepository;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::utils::db::{build_db_pool, create_table};

pub const BOOKS_TABLE: &str = "books";

pub async fn create_book_repository(config: &Configuration) -> LibraryResult<Box<dyn BookRepository>> {
    match config.store {
        RepositoryStore::InMemory => {
            Ok(Box::new(MemoryBookRepository::new()))
        }
        RepositoryStore::Postgres => {
            let pool = build_db_pool(&config.database).await?;
            create_table(&pool, BOOKS_TABLE).await?;
            Ok(Box::new(PgBookRepository::new(pool, BOOKS_TABLE)))
        }
    }
}
