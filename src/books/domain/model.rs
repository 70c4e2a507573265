use serde::{Deserialize, Serialize};

/// Id carried by a book that the store has not assigned yet.
pub const UNASSIGNED_ID: i64 = 0;

// BookEntity is the stored form of a catalog record. Its id belongs to the store: it is
// ignored on create and never overwritten on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntity {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub author: String,
    pub year: i64,
}

impl BookEntity {
    pub fn new(title: &str, isbn: &str, author: &str, year: i64) -> Self {
        Self {
            id: UNASSIGNED_ID,
            title: title.to_string(),
            isbn: isbn.to_string(),
            author: author.to_string(),
            year,
        }
    }

    /// Copies the fields of `self` under the given id.
    pub fn with_id(&self, id: i64) -> Self {
        Self {
            id,
            title: self.title.clone(),
            isbn: self.isbn.clone(),
            author: self.author.clone(),
            year: self.year,
        }
    }
}
