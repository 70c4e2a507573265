use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::command::parse_book_id;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct UpdateBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl UpdateBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

// The replacement record; the path segment decides which book is replaced
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UpdateBookCommandRequest {
    #[serde(skip)]
    pub(crate) book_id: String,
    pub(crate) title: String,
    pub(crate) isbn: String,
    pub(crate) author: String,
    pub(crate) year: i64,
}

impl UpdateBookCommandRequest {
    pub fn new(book_id: &str, title: &str, isbn: &str, author: &str, year: i64) -> Self {
        Self {
            book_id: book_id.to_string(),
            title: title.to_string(),
            isbn: isbn.to_string(),
            author: author.to_string(),
            year,
        }
    }

    pub fn build_book(&self) -> BookDto {
        BookDto::new(self.title.as_str(), self.isbn.as_str(), self.author.as_str(), self.year)
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub(crate) struct UpdateBookCommandResponse {
    pub book: BookDto,
}

impl UpdateBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        let id = parse_book_id(req.book_id.as_str())?;
        self.catalog_service.update_book(id, &req.build_book())
            .await.map_err(CommandError::from).map(UpdateBookCommandResponse::new)
    }
}
