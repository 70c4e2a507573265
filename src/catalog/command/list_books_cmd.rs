use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

pub(crate) struct ListBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl ListBooksCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, PartialEq)]
pub(crate) struct ListBooksCommandRequest {
    pub(crate) page: usize,
    pub(crate) limit: usize,
}

impl ListBooksCommandRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Builds a request from raw query values. Missing or non-integer values fall back to the
    /// defaults and anything below one is raised to one.
    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(parse_or(page, DEFAULT_PAGE), parse_or(limit, DEFAULT_PAGE_SIZE))
    }
}

fn parse_or(value: Option<&str>, default: usize) -> usize {
    match value.map(|v| v.trim().parse::<i64>()) {
        Some(Ok(n)) if n < 1 => 1,
        Some(Ok(n)) => usize::try_from(n).unwrap_or(default),
        _ => default,
    }
}

// Raw query string; kept untyped so bad values fall back instead of rejecting the request
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListBooksQuery {
    pub(crate) page: Option<String>,
    pub(crate) limit: Option<String>,
}

impl From<ListBooksQuery> for ListBooksCommandRequest {
    fn from(other: ListBooksQuery) -> Self {
        ListBooksCommandRequest::from_query(other.page.as_deref(), other.limit.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ListBooksCommandResponse {
    pub books: Vec<BookDto>,
    pub page: usize,
    pub total_pages: usize,
}

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        let res = self.catalog_service.find_books(req.page, req.limit).await?;
        Ok(ListBooksCommandResponse {
            books: res.records,
            page: res.page,
            total_pages: res.total_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::books::dto::BookDto;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest, ListBooksQuery};
    use crate::catalog::domain::CatalogService;
    use crate::catalog::domain::service::CatalogServiceImpl;
    use crate::core::command::Command;

    #[tokio::test]
    async fn test_should_build_request_from_query() {
        assert_eq!(ListBooksCommandRequest::new(1, 10), ListBooksCommandRequest::from_query(None, None));
        assert_eq!(ListBooksCommandRequest::new(3, 25), ListBooksCommandRequest::from_query(Some("3"), Some("25")));
        assert_eq!(ListBooksCommandRequest::new(1, 10), ListBooksCommandRequest::from_query(Some("x"), Some("")));
        assert_eq!(ListBooksCommandRequest::new(1, 1), ListBooksCommandRequest::from_query(Some("0"), Some("-4")));
        let query = ListBooksQuery { page: Some("2".to_string()), limit: None };
        assert_eq!(ListBooksCommandRequest::new(2, 10), ListBooksCommandRequest::from(query));
    }

    #[tokio::test]
    async fn test_should_run_list_books() {
        let svc: Arc<dyn CatalogService> = Arc::new(CatalogServiceImpl::new(Box::new(MemoryBookRepository::new())));
        for i in 0..7 {
            let _ = svc.add_book(&BookDto::new(format!("title_{}", i).as_str(), "isbn", "author", 2000 + i))
                .await.expect("should add book");
        }
        let cmd = ListBooksCommand::new(svc);

        let res = cmd.execute(ListBooksCommandRequest::new(2, 3)).await.expect("should list books");
        assert_eq!(2, res.page);
        assert_eq!(3, res.total_pages);
        let titles: Vec<&str> = res.books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(vec!["title_3", "title_4", "title_5"], titles);

        let beyond = cmd.execute(ListBooksCommandRequest::new(9, 3)).await.expect("should list books");
        assert!(beyond.books.is_empty());
        assert_eq!(3, beyond.total_pages);

        let json = serde_json::to_value(&res).expect("should serialize response");
        assert_eq!(2, json["page"]);
        assert_eq!(3, json["total_pages"]);
        assert_eq!(3, json["books"].as_array().map(|b| b.len()).unwrap_or_default());
    }
}
