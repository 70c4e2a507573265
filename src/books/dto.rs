use serde::{Deserialize, Serialize};
use crate::books::domain::model::{BookEntity, UNASSIGNED_ID};

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub author: String,
    pub year: i64,
}

impl BookDto {
    pub fn new(title: &str, isbn: &str, author: &str, year: i64) -> BookDto {
        BookDto {
            id: UNASSIGNED_ID,
            title: title.to_string(),
            isbn: isbn.to_string(),
            author: author.to_string(),
            year,
        }
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            id: other.id,
            title: other.title.to_string(),
            isbn: other.isbn.to_string(),
            author: other.author.to_string(),
            year: other.year,
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        Self {
            id: other.id,
            title: other.title.to_string(),
            isbn: other.isbn.to_string(),
            author: other.author.to_string(),
            year: other.year,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use crate::books::domain::model::BookEntity;
    use crate::books::dto::BookDto;

    #[tokio::test]
    async fn test_should_build_books() {
        let book = BookDto::new("title", "isbn", "author", 2001);
        assert_eq!("isbn", book.isbn.as_str());
        assert_eq!("title", book.title.as_str());
        assert_eq!(0, book.id);
    }

    #[tokio::test]
    async fn test_should_serialize_wire_shape() {
        let book = BookDto::from(&BookEntity::new("Title A", "0001", "Author A", 2001).with_id(7));
        let value = serde_json::to_value(&book).expect("should serialize");
        assert_eq!(json!({"id": 7, "title": "Title A", "isbn": "0001", "author": "Author A", "year": 2001}), value);
    }

    #[tokio::test]
    async fn test_should_convert_to_entity() {
        let mut book = BookDto::new("title", "isbn", "author", 2001);
        book.id = 3;
        let entity = BookEntity::from(&book);
        assert_eq!(BookEntity::new("title", "isbn", "author", 2001).with_id(3), entity);
    }
}
