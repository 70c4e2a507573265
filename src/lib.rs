pub mod books;
pub mod catalog;
pub mod core;
pub mod importer;
pub mod utils;
