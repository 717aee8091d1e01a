use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::RepositoryStore;

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable: Sync + Send {
    fn id(&self) -> String;
}

pub const DEFAULT_LOOKUP_URL: &str = "https://openlibrary.org/api/books";

// Configuration abstracts config options for the catalog service
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub store: RepositoryStore,
    pub data_file: String,
    pub database_url: Option<String>,
    pub pool_size: u32,
    pub table_name: String,
    pub lookup_url: String,
    pub lookup_timeout_secs: u64,
    pub bind_addr: String,
    pub lambda_runtime: bool,
}

impl Configuration {
    pub fn new(store: RepositoryStore) -> Self {
        Configuration {
            store,
            data_file: "library.json".to_string(),
            database_url: None,
            pool_size: 10,
            table_name: "books".to_string(),
            lookup_url: DEFAULT_LOOKUP_URL.to_string(),
            lookup_timeout_secs: 10,
            bind_addr: "0.0.0.0:8000".to_string(),
            lambda_runtime: false,
        }
    }

    pub fn from_env() -> LibraryResult<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    // Builds configuration from any key/value source; a postgres store without a
    // database url is rejected here so that startup fails before serving.
    pub fn from_source<F: Fn(&str) -> Option<String>>(source: F) -> LibraryResult<Self> {
        let get = |key: &str| source(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let store = match get("BOOKS_STORE") {
            Some(name) => RepositoryStore::parse(name.as_str())?,
            None => RepositoryStore::File,
        };
        let mut config = Configuration::new(store);
        if let Some(file) = get("LIBRARY_FILE") {
            config.data_file = file;
        }
        config.database_url = get("DATABASE_URL");
        if let Some(size) = get("DATABASE_POOL_SIZE") {
            config.pool_size = parse_number("DATABASE_POOL_SIZE", size.as_str())?;
        }
        if let Some(table) = get("BOOKS_TABLE") {
            config.table_name = table;
        }
        if let Some(url) = get("OPEN_LIBRARY_URL") {
            config.lookup_url = url;
        }
        if let Some(secs) = get("LOOKUP_TIMEOUT_SECS") {
            config.lookup_timeout_secs = parse_number("LOOKUP_TIMEOUT_SECS", secs.as_str())?;
        }
        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr;
        }
        config.lambda_runtime = get("AWS_LAMBDA_RUNTIME_API").is_some();

        if config.store == RepositoryStore::Postgres && config.database_url.is_none() {
            return Err(LibraryError::validation(
                "DATABASE_URL environment variable is not set, the application cannot start",
                Some("DATABASE_URL".to_string())));
        }
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> LibraryResult<T> {
    value.parse::<T>().map_err(|_| LibraryError::validation(
        format!("invalid numeric value {:?} for {}", value, key).as_str(), Some(key.to_string())))
}
