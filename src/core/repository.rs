use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use async_trait::async_trait;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity, the repository assigns its id
    async fn create(&self, entity: &Entity) -> LibraryResult<Entity>;

    // replaces every field of the entity with the given id
    async fn update(&self, id: i64, entity: &Entity) -> LibraryResult<Entity>;

    // get an entity
    async fn get(&self, id: i64) -> LibraryResult<Entity>;

    // delete an entity
    async fn delete(&self, id: i64) -> LibraryResult<()>;

    // pages through all entities in id order
    async fn query(&self, page: usize, page_size: usize) -> LibraryResult<PaginatedResult<Entity>>;
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum RepositoryStore {
    InMemory,
    Postgres,
}

impl FromStr for RepositoryStore {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => Ok(RepositoryStore::InMemory),
            "postgres" | "postgresql" => Ok(RepositoryStore::Postgres),
            other => Err(LibraryError::validation(
                format!("unknown catalog store {}", other).as_str(), Some("CATALOG_STORE".to_string()))),
        }
    }
}

impl Display for RepositoryStore {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RepositoryStore::InMemory => write!(f, "memory"),
            RepositoryStore::Postgres => write!(f, "postgres"),
        }
    }
}
