use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::catalog::command::parse_book_id;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct RemoveBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl RemoveBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct RemoveBookCommandRequest {
    pub(crate) book_id: String,
}

impl RemoveBookCommandRequest {
    pub fn new(book_id: String) -> Self {
        Self {
            book_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RemoveBookCommandResponse {
    pub message: String,
}

impl RemoveBookCommandResponse {
    pub fn new(id: i64) -> Self {
        Self {
            message: format!("Book with ID {} has been deleted", id),
        }
    }
}

#[async_trait]
impl Command<RemoveBookCommandRequest, RemoveBookCommandResponse> for RemoveBookCommand {
    async fn execute(&self, req: RemoveBookCommandRequest) -> Result<RemoveBookCommandResponse, CommandError> {
        let id = parse_book_id(req.book_id.as_str())?;
        self.catalog_service.remove_book(id)
            .await.map_err(CommandError::from).map(|_| RemoveBookCommandResponse::new(id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::books::dto::BookDto;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
    use crate::catalog::domain::CatalogService;
    use crate::catalog::domain::service::CatalogServiceImpl;
    use crate::core::command::{Command, CommandError};

    #[tokio::test]
    async fn test_should_run_remove_book() {
        let svc: Arc<dyn CatalogService> = Arc::new(CatalogServiceImpl::new(Box::new(MemoryBookRepository::new())));
        let added = svc.add_book(&BookDto::new("test book", "isbn", "author", 2001))
            .await.expect("should add book");
        let cmd = RemoveBookCommand::new(svc.clone());

        let res = cmd.execute(RemoveBookCommandRequest::new(added.id.to_string()))
            .await.expect("should remove book");
        assert_eq!(format!("Book with ID {} has been deleted", added.id), res.message);

        let again = cmd.execute(RemoveBookCommandRequest::new(added.id.to_string())).await;
        assert!(matches!(again, Err(CommandError::NotFound { .. })));
        let res = svc.find_books(1, 10).await.expect("should list books");
        assert_eq!(0, res.total_records);
    }
}
