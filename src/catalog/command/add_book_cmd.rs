use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct AddBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl AddBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

// Every field is optional on the wire and falls back to its zero value; a supplied id is ignored
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AddBookCommandRequest {
    pub(crate) title: String,
    pub(crate) isbn: String,
    pub(crate) author: String,
    pub(crate) year: i64,
}

impl AddBookCommandRequest {
    pub fn new(title: &str, isbn: &str, author: &str, year: i64) -> Self {
        Self {
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
pub(crate) struct AddBookCommandResponse {
    pub book: BookDto,
}

impl AddBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<AddBookCommandRequest, AddBookCommandResponse> for AddBookCommand {
    async fn execute(&self, req: AddBookCommandRequest) -> Result<AddBookCommandResponse, CommandError> {
        let book = req.build_book();
        self.catalog_service.add_book(&book).await.map_err(CommandError::from).map(AddBookCommandResponse::new)
    }
}
