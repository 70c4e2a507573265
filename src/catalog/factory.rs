use std::sync::Arc;
use crate::books::factory;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::core::domain::{Configuration, SeedConfig, SeedFailurePolicy};
use crate::core::library::{LibraryError, LibraryResult};
use crate::importer::BookImporter;

/// Builds the book store selected by `config`, seeds it when a seed file is configured and
/// wraps it in a shareable catalog service.
pub async fn create_catalog_service(config: &Configuration) -> LibraryResult<Arc<dyn CatalogService>> {
    let book_repo = factory::create_book_repository(config).await?;
    tracing::info!(store = %config.store, "book store ready");

    if let Some(seed) = &config.seed {
        seed_books(book_repo.as_ref(), seed).await?;
    }
    Ok(Arc::new(CatalogServiceImpl::new(book_repo)))
}

async fn seed_books(book_repo: &dyn BookRepository, seed: &SeedConfig) -> LibraryResult<()> {
    let importer = BookImporter::new(book_repo, seed.delimiter, seed.row_policy);
    match importer.import_path(seed.path.as_path()).await {
        Ok(summary) => {
            tracing::info!(path = %seed.path.display(), imported = summary.imported,
                skipped = summary.skipped, "seeded book store");
            Ok(())
        }
        Err(err @ LibraryError::Import { .. }) if seed.failure_policy == SeedFailurePolicy::Continue => {
            let total = book_repo.count().await?;
            tracing::error!(path = %seed.path.display(), error = %err, books = total,
                "seeding failed, serving existing books");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
