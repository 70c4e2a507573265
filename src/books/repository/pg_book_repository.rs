use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult, normalize_page, page_offset};
use crate::core::repository::Repository;

const BOOK_COLUMNS: &str = "id, title, isbn, author, year";

/// Book store backed by a PostgreSQL table. Ids come from the table's `BIGSERIAL` sequence
/// and pages are read in id order.
#[derive(Debug, Clone)]
pub struct PgBookRepository {
    pool: PgPool,
    table_name: String,
}

impl PgBookRepository {
    pub fn new(pool: PgPool, table_name: &str) -> Self {
        Self {
            pool,
            table_name: table_name.to_string(),
        }
    }
}

#[async_trait]
impl Repository<BookEntity> for PgBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let sql = format!("INSERT INTO {} (title, isbn, author, year) VALUES ($1, $2, $3, $4) RETURNING {}",
                          self.table_name, BOOK_COLUMNS);
        let row = sqlx::query(sql.as_str())
            .bind(entity.title.as_str())
            .bind(entity.isbn.as_str())
            .bind(entity.author.as_str())
            .bind(entity.year)
            .fetch_one(&self.pool)
            .await?;
        map_to_book(&row)
    }

    async fn update(&self, id: i64, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let sql = format!("UPDATE {} SET title = $1, isbn = $2, author = $3, year = $4 WHERE id = $5 RETURNING {}",
                          self.table_name, BOOK_COLUMNS);
        let row = sqlx::query(sql.as_str())
            .bind(entity.title.as_str())
            .bind(entity.isbn.as_str())
            .bind(entity.author.as_str())
            .bind(entity.year)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => map_to_book(&row),
            None => Err(LibraryError::not_found(format!("book not found for {}", id).as_str())),
        }
    }

    async fn get(&self, id: i64) -> LibraryResult<BookEntity> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", BOOK_COLUMNS, self.table_name);
        let row = sqlx::query(sql.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => map_to_book(&row),
            None => Err(LibraryError::not_found(format!("book not found for {}", id).as_str())),
        }
    }

    async fn delete(&self, id: i64) -> LibraryResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table_name);
        let res = sqlx::query(sql.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(LibraryError::not_found(format!("book not found for {}", id).as_str()));
        }
        Ok(())
    }

    // The page and the count are read from one snapshot so total_pages matches the records.
    async fn query(&self, page: usize, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let (page, page_size) = normalize_page(page, page_size);
        let limit = i64::try_from(page_size).unwrap_or(i64::MAX);
        let offset = i64::try_from(page_offset(page, page_size)).unwrap_or(i64::MAX);

        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        let sql = format!("SELECT {} FROM {} ORDER BY id LIMIT $1 OFFSET $2", BOOK_COLUMNS, self.table_name);
        let rows = sqlx::query(sql.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *tx)
            .await?;
        let sql = format!("SELECT COUNT(*) FROM {}", self.table_name);
        let total: i64 = sqlx::query_scalar(sql.as_str())
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        let records = rows.iter().map(map_to_book).collect::<LibraryResult<Vec<BookEntity>>>()?;
        Ok(PaginatedResult::new(page, page_size, usize::try_from(total).unwrap_or(0), records))
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn count(&self) -> LibraryResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table_name);
        let total: i64 = sqlx::query_scalar(sql.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(total).unwrap_or(0))
    }
}

fn map_to_book(row: &PgRow) -> LibraryResult<BookEntity> {
    Ok(BookEntity {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        isbn: row.try_get("isbn")?,
        author: row.try_get("author")?,
        year: row.try_get("year")?,
    })
}
