use std::fmt;
use std::fmt::{Display, Formatter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult};

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // ensures the backing store exists, safe to call on every start
    async fn setup(&self) -> LibraryResult<()>;

    // create an entity, fails with DuplicateKey if its id is already stored
    async fn create(&self, entity: &Entity) -> LibraryResult<usize>;

    // get an entity
    async fn get(&self, id: &str) -> LibraryResult<Entity>;

    // delete an entity, returns number of removed entities
    async fn delete(&self, id: &str) -> LibraryResult<usize>;

    // all entities in unspecified order
    async fn query_all(&self) -> LibraryResult<Vec<Entity>>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    File,
    Postgres,
}

impl RepositoryStore {
    pub fn parse(name: &str) -> LibraryResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(RepositoryStore::File),
            "postgres" | "postgresql" => Ok(RepositoryStore::Postgres),
            other => Err(LibraryError::validation(
                format!("unknown repository store {:?}", other).as_str(), Some("BOOKS_STORE".to_string()))),
        }
    }
}

impl Display for RepositoryStore {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RepositoryStore::File => write!(f, "file"),
            RepositoryStore::Postgres => write!(f, "postgres"),
        }
    }
}
