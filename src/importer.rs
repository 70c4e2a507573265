//! Bulk import of delimiter-separated book files into a [`BookRepository`].
//!
//! The header row decides where each field lives; columns are looked up by name, so their
//! order is free and unknown columns are ignored. Header problems and unreadable input fail
//! the whole import. A malformed data row is either skipped or fails the import, depending on
//! the [`RowPolicy`].

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ByteRecord, Position, ReaderBuilder, Trim};

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult};

pub const ISBN_COLUMN: &str = "ISBN";
pub const TITLE_COLUMN: &str = "Book-Title";
pub const AUTHOR_COLUMN: &str = "Book-Author";
pub const YEAR_COLUMN: &str = "Year-Of-Publication";

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum RowPolicy {
    Skip,
    Fail,
}

impl FromStr for RowPolicy {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(RowPolicy::Skip),
            "fail" => Ok(RowPolicy::Fail),
            other => Err(LibraryError::validation(
                format!("unknown import row policy {}", other).as_str(), Some("SEED_ROW_POLICY".to_string()))),
        }
    }
}

#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

// Positions of the mapped columns within a record
#[derive(Debug, PartialEq, Clone, Copy)]
struct ColumnMapping {
    isbn: usize,
    title: usize,
    author: usize,
    year: usize,
}

impl ColumnMapping {
    fn from_header(header: &ByteRecord) -> LibraryResult<Self> {
        let names: Vec<String> = header.iter()
            .map(|cell| decode_cell(cell).trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let index_of = |column: &str| names.iter().position(|name| name == column);

        let missing: Vec<&str> = [ISBN_COLUMN, TITLE_COLUMN, AUTHOR_COLUMN, YEAR_COLUMN].into_iter()
            .filter(|column| index_of(*column).is_none())
            .collect();
        match (index_of(ISBN_COLUMN), index_of(TITLE_COLUMN), index_of(AUTHOR_COLUMN), index_of(YEAR_COLUMN)) {
            (Some(isbn), Some(title), Some(author), Some(year)) => Ok(Self { isbn, title, author, year }),
            _ => Err(LibraryError::import_at(
                format!("import header {:?} is missing columns {:?}", names, missing).as_str(), 1)),
        }
    }

    fn parse_row(&self, record: &ByteRecord) -> Result<BookEntity, String> {
        let cell = |index: usize, column: &str| -> Result<String, String> {
            let value = record.get(index)
                .map(decode_cell)
                .ok_or_else(|| format!("missing {} value", column))?;
            // text columns cannot hold NUL on every backend
            if value.contains('\0') {
                return Err(format!("{} value contains a NUL byte", column));
            }
            Ok(value)
        };

        let isbn = cell(self.isbn, ISBN_COLUMN)?;
        let title = cell(self.title, TITLE_COLUMN)?;
        let author = cell(self.author, AUTHOR_COLUMN)?;
        let year = cell(self.year, YEAR_COLUMN)?;
        let year = year.trim().parse::<i64>()
            .map_err(|err| format!("invalid {} {:?}: {}", YEAR_COLUMN, year, err))?;
        Ok(BookEntity::new(title.trim(), isbn.trim(), author.trim(), year))
    }
}

// the reference data set is not valid UTF-8 throughout, so bad bytes are replaced rather than rejected
fn decode_cell(cell: &[u8]) -> String {
    String::from_utf8_lossy(cell).into_owned()
}

fn record_number(position: &Position) -> u64 {
    position.record().saturating_add(1)
}

pub struct BookImporter<'a> {
    repository: &'a dyn BookRepository,
    delimiter: u8,
    row_policy: RowPolicy,
}

impl<'a> BookImporter<'a> {
    pub fn new(repository: &'a dyn BookRepository, delimiter: u8, row_policy: RowPolicy) -> Self {
        Self {
            repository,
            delimiter,
            row_policy,
        }
    }

    pub async fn import_path(&self, path: &Path) -> LibraryResult<ImportSummary> {
        let bytes = tokio::fs::read(path).await.map_err(|err| LibraryError::import(
            format!("failed to open import file {} due to {}", path.display(), err).as_str()))?;
        self.import(bytes.as_slice()).await
    }

    /// Creates one book per data row of `source`, in file order.
    pub async fn import<R: Read + Send>(&self, source: R) -> LibraryResult<ImportSummary> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(source);

        let header = reader.byte_headers().map_err(|err| LibraryError::import_at(
            format!("failed to read import header due to {}", err).as_str(), 1))?.clone();
        let mapping = ColumnMapping::from_header(&header)?;

        let mut summary = ImportSummary::default();
        let mut record = ByteRecord::new();
        loop {
            // rows are numbered by record, header is 1, so CRLF and LF files agree
            let line = record_number(reader.position());
            let row = match reader.read_byte_record(&mut record) {
                Ok(false) => break,
                Ok(true) => mapping.parse_row(&record),
                Err(err) if err.is_io_error() => {
                    return Err(LibraryError::import_at(
                        format!("failed to read import source due to {}", err).as_str(), line));
                }
                Err(err) => Err(err.to_string()),
            };
            let line = record.position().map(record_number).unwrap_or(line);

            match row {
                Ok(book) => {
                    self.repository.create(&book).await?;
                    summary.imported += 1;
                }
                Err(reason) => match self.row_policy {
                    RowPolicy::Skip => {
                        tracing::warn!(line, reason = reason.as_str(), "skipping malformed import row");
                        summary.skipped += 1;
                    }
                    RowPolicy::Fail => {
                        return Err(LibraryError::import_at(
                            format!("malformed import row: {}", reason).as_str(), line));
                    }
                },
            }
        }
        tracing::info!(imported = summary.imported, skipped = summary.skipped, "import finished");
        Ok(summary)
    }
}
