use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};

pub struct CatalogServiceImpl {
    book_repository: Box<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub fn new(book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            book_repository,
        }
    }
}

fn log_failure(op: &str, err: &LibraryError) {
    match err {
        LibraryError::StoreUnavailable { retryable, .. } => {
            tracing::error!(op, retryable, error = %err, "book store failure");
        }
        LibraryError::Runtime { .. } => {
            tracing::error!(op, error = %err, "catalog runtime failure");
        }
        _ => {}
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        let created = self.book_repository.create(&BookEntity::from(book)).await
            .map_err(|err| { log_failure("add_book", &err); err })?;
        tracing::debug!(id = created.id, "book added");
        Ok(BookDto::from(&created))
    }

    async fn remove_book(&self, id: i64) -> LibraryResult<()> {
        self.book_repository.delete(id).await
            .map_err(|err| { log_failure("remove_book", &err); err })?;
        tracing::debug!(id, "book removed");
        Ok(())
    }

    async fn update_book(&self, id: i64, book: &BookDto) -> LibraryResult<BookDto> {
        self.book_repository.update(id, &BookEntity::from(book)).await
            .map(|b| BookDto::from(&b))
            .map_err(|err| { log_failure("update_book", &err); err })
    }

    async fn find_book_by_id(&self, id: i64) -> LibraryResult<BookDto> {
        self.book_repository.get(id).await
            .map(|b| BookDto::from(&b))
            .map_err(|err| { log_failure("find_book_by_id", &err); err })
    }

    async fn find_books(&self, page: usize, page_size: usize) -> LibraryResult<PaginatedResult<BookDto>> {
        let res = self.book_repository.query(page, page_size).await
            .map_err(|err| { log_failure("find_books", &err); err })?;
        Ok(res.map(|b| BookDto::from(&b)))
    }
}
