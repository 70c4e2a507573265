use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult, normalize_page, page_offset};
use crate::core::repository::Repository;

// Ids are issued in increasing order, so the key order of the map is also the insertion order.
#[derive(Debug, Default)]
struct MemoryState {
    books: BTreeMap<i64, BookEntity>,
    last_id: i64,
}

/// Process-local book store. One mutex guards the records and the id counter together, so
/// id allocation is atomic with the insert.
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    state: Mutex<MemoryState>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> LibraryResult<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| LibraryError::runtime("book store lock poisoned", None))
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn create(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let mut state = self.lock()?;
        let id = state.last_id.checked_add(1)
            .ok_or_else(|| LibraryError::runtime("book id space exhausted", None))?;
        state.last_id = id;
        let book = entity.with_id(id);
        state.books.insert(id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: i64, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let mut state = self.lock()?;
        match state.books.get_mut(&id) {
            Some(existing) => {
                *existing = entity.with_id(id);
                Ok(existing.clone())
            }
            None => Err(LibraryError::not_found(format!("book not found for {}", id).as_str())),
        }
    }

    async fn get(&self, id: i64) -> LibraryResult<BookEntity> {
        let state = self.lock()?;
        state.books.get(&id).cloned()
            .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", id).as_str()))
    }

    async fn delete(&self, id: i64) -> LibraryResult<()> {
        let mut state = self.lock()?;
        state.books.remove(&id).map(|_| ())
            .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", id).as_str()))
    }

    async fn query(&self, page: usize, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let (page, page_size) = normalize_page(page, page_size);
        let state = self.lock()?;
        let records = state.books.values()
            .skip(page_offset(page, page_size))
            .take(page_size)
            .cloned()
            .collect();
        Ok(PaginatedResult::new(page, page_size, state.books.len(), records))
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn count(&self) -> LibraryResult<usize> {
        Ok(self.lock()?.books.len())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use crate::books::domain::model::BookEntity;
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::core::library::LibraryError;
    use crate::core::repository::Repository;

    #[tokio::test]
    async fn test_should_create_get_books() {
        let books_repo = MemoryBookRepository::new();
        let book = BookEntity::new("test book", "isbn", "author", 2001);
        let created = books_repo.create(&book).await.expect("should create book");
        assert_ne!(0, created.id);

        let loaded = books_repo.get(created.id).await.expect("should return book");
        assert_eq!(book.with_id(created.id), loaded);
    }

    #[tokio::test]
    async fn test_should_ignore_supplied_id_on_create() {
        let books_repo = MemoryBookRepository::new();
        let created = books_repo.create(&BookEntity::new("a", "b", "c", 1).with_id(99)).await.expect("should create book");
        assert_eq!(1, created.id);
        assert!(books_repo.get(99).await.is_err());
    }

    #[tokio::test]
    async fn test_should_issue_increasing_ids() {
        let books_repo = MemoryBookRepository::new();
        let mut last = 0;
        for i in 0..20 {
            let created = books_repo.create(&BookEntity::new(format!("title_{}", i).as_str(), "isbn", "author", i))
                .await.expect("should create book");
            assert!(created.id > last);
            last = created.id;
        }
    }

    #[tokio::test]
    async fn test_should_not_reuse_deleted_ids() {
        let books_repo = MemoryBookRepository::new();
        let first = books_repo.create(&BookEntity::new("a", "b", "c", 1)).await.expect("should create book");
        let second = books_repo.create(&BookEntity::new("a", "b", "c", 1)).await.expect("should create book");
        books_repo.delete(second.id).await.expect("should delete book");
        let third = books_repo.create(&BookEntity::new("a", "b", "c", 1)).await.expect("should create book");
        assert!(third.id > second.id);
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_should_create_update_books() {
        let books_repo = MemoryBookRepository::new();
        let created = books_repo.create(&BookEntity::new("test book", "isbn", "author", 2001))
            .await.expect("should create book");

        // full replace: omitted fields come in as zero values and overwrite the record
        let payload = BookEntity::new("new title", "", "", 0).with_id(12345);
        let updated = books_repo.update(created.id, &payload).await.expect("should update book");
        assert_eq!(created.id, updated.id);
        assert_eq!("new title", updated.title.as_str());
        assert_eq!("", updated.isbn.as_str());
        assert_eq!(0, updated.year);

        let loaded = books_repo.get(created.id).await.expect("should return book");
        assert_eq!(updated, loaded);
        assert!(books_repo.get(12345).await.is_err());
    }

    #[tokio::test]
    async fn test_should_fail_missing_ids_without_changes() {
        let books_repo = MemoryBookRepository::new();
        let created = books_repo.create(&BookEntity::new("test book", "isbn", "author", 2001))
            .await.expect("should create book");

        assert!(matches!(books_repo.get(created.id + 1).await, Err(LibraryError::NotFound { .. })));
        assert!(matches!(books_repo.update(created.id + 1, &BookEntity::new("x", "x", "x", 1)).await, Err(LibraryError::NotFound { .. })));
        assert!(matches!(books_repo.delete(created.id + 1).await, Err(LibraryError::NotFound { .. })));

        assert_eq!(1, books_repo.count().await.expect("should count"));
        assert_eq!(created, books_repo.get(created.id).await.expect("should return book"));
    }

    #[tokio::test]
    async fn test_should_create_delete_books() {
        let books_repo = MemoryBookRepository::new();
        let created = books_repo.create(&BookEntity::new("test book", "isbn", "author", 2001))
            .await.expect("should create book");
        books_repo.delete(created.id).await.expect("should delete book");

        let loaded = books_repo.get(created.id).await;
        assert!(loaded.is_err());
        assert!(matches!(books_repo.delete(created.id).await, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_page_empty_store() {
        let books_repo = MemoryBookRepository::new();
        let res = books_repo.query(1, 10).await.expect("should return page");
        assert!(res.records.is_empty());
        assert_eq!(0, res.total_pages);
        assert_eq!(0, res.total_records);
    }

    #[tokio::test]
    async fn test_should_page_books_in_insertion_order() {
        let books_repo = MemoryBookRepository::new();
        add_test_books(&books_repo, 23).await;

        let mut seen = vec![];
        for page in 1..=3 {
            let res = books_repo.query(page, 10).await.expect("should return page");
            assert_eq!(3, res.total_pages);
            assert_eq!(23, res.total_records);
            let expected = if page == 3 { 3 } else { 10 };
            assert_eq!(expected, res.records.len());
            seen.extend(res.records.into_iter().map(|b| b.title));
        }
        let expected: Vec<String> = (0..23).map(|i| format!("title_{}", i)).collect();
        assert_eq!(expected, seen);

        let res = books_repo.query(4, 10).await.expect("should return page");
        assert!(res.records.is_empty());
        assert_eq!(3, res.total_pages);

        let res = books_repo.query(usize::MAX, usize::MAX).await.expect("should return page");
        assert!(res.records.is_empty());
        assert_eq!(1, res.total_pages);
    }

    #[tokio::test]
    async fn test_should_fill_last_page_when_evenly_divided() {
        let books_repo = MemoryBookRepository::new();
        add_test_books(&books_repo, 20).await;
        let res = books_repo.query(2, 10).await.expect("should return page");
        assert_eq!(2, res.total_pages);
        assert_eq!(10, res.records.len());
    }

    #[tokio::test]
    async fn test_should_clamp_page_and_limit() {
        let books_repo = MemoryBookRepository::new();
        add_test_books(&books_repo, 3).await;
        let res = books_repo.query(0, 0).await.expect("should return page");
        assert_eq!(1, res.page);
        assert_eq!(1, res.page_size);
        assert_eq!(3, res.total_pages);
        assert_eq!("title_0", res.records[0].title.as_str());
    }

    #[tokio::test]
    async fn test_should_exclude_deleted_books_from_pages() {
        let books_repo = MemoryBookRepository::new();
        let ids = add_test_books(&books_repo, 11).await;
        books_repo.delete(ids[0]).await.expect("should delete book");

        let res = books_repo.query(1, 10).await.expect("should return page");
        assert_eq!(1, res.total_pages);
        assert_eq!(10, res.records.len());
        assert!(res.records.iter().all(|b| b.id != ids[0]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_not_duplicate_ids_under_concurrent_creates() {
        let books_repo = Arc::new(MemoryBookRepository::new());
        let mut handles = vec![];
        for t in 0..8 {
            let repo = books_repo.clone();
            handles.push(tokio::spawn(async move {
                let mut ids = vec![];
                for i in 0..50 {
                    let book = BookEntity::new(format!("title_{}_{}", t, i).as_str(), "isbn", "author", i);
                    ids.push(repo.create(&book).await.expect("should create book").id);
                }
                ids
            }));
        }
        let mut all_ids = HashSet::new();
        let mut total = 0;
        for handle in handles {
            let ids = handle.await.expect("task should finish");
            // ids observed by one task are strictly increasing
            assert!(ids.windows(2).all(|w| w[0] < w[1]));
            total += ids.len();
            all_ids.extend(ids);
        }
        assert_eq!(400, total);
        assert_eq!(400, all_ids.len());
        assert_eq!(400, books_repo.count().await.expect("should count"));
    }

    async fn add_test_books(books_repo: &MemoryBookRepository, n: i64) -> Vec<i64> {
        let mut ids = vec![];
        for i in 0..n {
            let book = BookEntity::new(format!("title_{}", i).as_str(),
                                       format!("isbn_{}", i).as_str(), "author", 2000 + i);
            ids.push(books_repo.create(&book).await.expect("should create book").id);
        }
        ids
    }
}
