use std::fmt;
use std::fmt::{Display, Formatter};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug)]
pub enum LibraryError {
    NotFound {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    // The backing store could not be reached or rejected a statement. Pool timeouts and
    // dropped connections are retryable, constraint or schema failures are not.
    StoreUnavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Import {
        message: String,
        // 1-based record number, header included
        line: Option<u64>,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::StoreUnavailable { message: message.to_string(), reason_code, retryable }
    }

    pub fn import(message: &str) -> LibraryError {
        LibraryError::Import { message: message.to_string(), line: None }
    }

    pub fn import_at(message: &str, line: u64) -> LibraryError {
        LibraryError::Import { message: message.to_string(), line: Some(line) }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::NotFound { .. } => { false }
            LibraryError::Validation { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::StoreUnavailable { retryable, .. } => { *retryable }
            LibraryError::Import { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(
            format!("io {:?}", err).as_str(), Some(format!("{:?}", err.kind())))
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::NotFound { message } => {
                write!(f, "{}", message)
            }
            LibraryError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            LibraryError::Serialization { message } => {
                write!(f, "{}", message)
            }
            LibraryError::StoreUnavailable { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            LibraryError::Import { message, line: Some(line) } => {
                write!(f, "{} at line {}", message, line)
            }
            LibraryError::Import { message, line: None } => {
                write!(f, "{}", message)
            }
            LibraryError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

impl std::error::Error for LibraryError {}

/// A specialized Result type for the catalog.
pub type LibraryResult<T> = Result<T, LibraryError>;

/// Clamps a requested page and page size so both are at least one.
pub fn normalize_page(page: usize, page_size: usize) -> (usize, usize) {
    (page.max(1), page_size.max(1))
}

/// Zero-based offset of the first record on `page`, saturating instead of overflowing.
pub fn page_offset(page: usize, page_size: usize) -> usize {
    let (page, page_size) = normalize_page(page, page_size);
    (page - 1).saturating_mul(page_size)
}

/// Number of pages needed to hold `total_records` at `page_size` records per page.
pub fn total_pages(total_records: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total_records / page_size + usize::from(total_records % page_size != 0)
}

// It defines abstraction for paginated result
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult<T> {
    // 1-based page number
    pub page: usize,
    // page size
    pub page_size: usize,
    // number of records in the whole collection when the page was read
    pub total_records: usize,
    pub total_pages: usize,
    // list of records
    pub records: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub fn new(page: usize, page_size: usize, total_records: usize, records: Vec<T>) -> Self {
        let (page, page_size) = normalize_page(page, page_size);
        PaginatedResult {
            page,
            page_size,
            total_records,
            total_pages: total_pages(total_records, page_size),
            records,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PaginatedResult<U> {
        PaginatedResult {
            page: self.page,
            page_size: self.page_size,
            total_records: self.total_records,
            total_pages: self.total_pages,
            records: self.records.into_iter().map(f).collect(),
        }
    }
}
