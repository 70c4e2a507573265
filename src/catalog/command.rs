pub mod add_book_cmd;
pub mod get_book_cmd;
pub mod list_books_cmd;
pub mod remove_book_cmd;
pub mod update_book_cmd;

use crate::core::library::{LibraryError, LibraryResult};

// Path ids arrive as raw strings; anything that isn't an integer is rejected before the store is touched
pub(crate) fn parse_book_id(book_id: &str) -> LibraryResult<i64> {
    book_id.trim().parse::<i64>().map_err(|_| LibraryError::validation(
        format!("Invalid book ID {}", book_id).as_str(), Some("book_id".to_string())))
}
