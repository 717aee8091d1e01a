use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use crate::books::dto::BookDto;
use crate::core::library::LibraryResult;
use crate::gateway::lookup::BookLookup;

pub const BIBKEY_PREFIX: &str = "ISBN:";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

// See https://openlibrary.org/dev/docs/api/books
#[derive(Debug, Deserialize)]
struct LookupEntry {
    title: Option<String>,
    authors: Option<Vec<LookupAuthor>>,
}

#[derive(Debug, Deserialize)]
struct LookupAuthor {
    name: String,
}

impl LookupEntry {
    fn to_book(&self, isbn: &str) -> BookDto {
        let title = self.title.as_deref().unwrap_or(UNKNOWN_TITLE);
        let author = match self.authors.as_deref() {
            Some(authors) if !authors.is_empty() => {
                authors.iter().map(|a| a.name.as_str()).collect::<Vec<&str>>().join(", ")
            }
            _ => UNKNOWN_AUTHOR.to_string(),
        };
        BookDto::new(isbn, title, author.as_str())
    }
}

pub struct OpenLibraryClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn new(base_url: &str, timeout: Duration) -> LibraryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }
}

#[async_trait]
impl BookLookup for OpenLibraryClient {
    async fn lookup(&self, isbn: &str) -> LibraryResult<Option<BookDto>> {
        let bibkey = format!("{}{}", BIBKEY_PREFIX, isbn);
        debug!(isbn, url = self.base_url.as_str(), "fetching book data");
        let res = self.client
            .get(self.base_url.as_str())
            .query(&[("bibkeys", bibkey.as_str()), ("format", "json"), ("jscmd", "data")])
            .send()
            .await
            .and_then(|res| res.error_for_status());
        let body = match res {
            Ok(res) => res.bytes().await?,
            Err(err) => {
                error!(isbn, status = ?err.status(), "book lookup request failed: {}", err);
                return Err(err.into());
            }
        };
        parse_lookup_response(isbn, &body)
    }
}

// Parses `{"ISBN:<isbn>": {"title": .., "authors": [{"name": ..}]}}`; a body of any
// other shape is a serialization error rather than a missing book.
pub(crate) fn parse_lookup_response(isbn: &str, body: &[u8]) -> LibraryResult<Option<BookDto>> {
    let entries: HashMap<String, LookupEntry> = serde_json::from_slice(body)?;
    let bibkey = format!("{}{}", BIBKEY_PREFIX, isbn);
    Ok(entries.get(&bibkey).map(|entry| entry.to_book(isbn)))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use axum::http::StatusCode;
    use serde_json::json;
    use crate::books::dto::BookDto;
    use crate::core::library::LibraryError;
    use crate::gateway::lookup::BookLookup;
    use crate::gateway::openlibrary::client::{parse_lookup_response, OpenLibraryClient, UNKNOWN_AUTHOR, UNKNOWN_TITLE};
    use crate::utils::testing::{hobbit_response, spawn_open_library, HOBBIT_ISBN};

    #[tokio::test]
    async fn test_should_map_book() {
        let body = hobbit_response().to_string();
        let book = parse_lookup_response(HOBBIT_ISBN, body.as_bytes()).expect("should parse").expect("should find book");
        assert_eq!(BookDto::new(HOBBIT_ISBN, "The Hobbit", "J.R.R. Tolkien"), book);
    }

    #[tokio::test]
    async fn test_should_join_authors() {
        let body = json!({"ISBN:1": {"title": "Good Omens", "authors": [{"name": "Terry Pratchett"}, {"name": "Neil Gaiman"}]}}).to_string();
        let book = parse_lookup_response("1", body.as_bytes()).expect("should parse").expect("should find book");
        assert_eq!("Terry Pratchett, Neil Gaiman", book.author.as_str());
    }

    #[tokio::test]
    async fn test_should_default_missing_fields() {
        let body = json!({"ISBN:1": {"authors": []}, "ISBN:2": {"title": null}}).to_string();
        let first = parse_lookup_response("1", body.as_bytes()).expect("should parse").expect("should find book");
        assert_eq!(UNKNOWN_TITLE, first.title.as_str());
        assert_eq!(UNKNOWN_AUTHOR, first.author.as_str());
        let second = parse_lookup_response("2", body.as_bytes()).expect("should parse").expect("should find book");
        assert_eq!(UNKNOWN_TITLE, second.title.as_str());
        assert_eq!(UNKNOWN_AUTHOR, second.author.as_str());
    }

    #[tokio::test]
    async fn test_should_return_none_for_missing_key() {
        assert_eq!(None, parse_lookup_response("1", b"{}").expect("should parse"));
        let other = json!({"ISBN:2": {"title": "other"}}).to_string();
        assert_eq!(None, parse_lookup_response("1", other.as_bytes()).expect("should parse"));
    }

    #[tokio::test]
    async fn test_should_fail_closed_on_shape_mismatch() {
        assert!(matches!(parse_lookup_response("1", b"[]"), Err(LibraryError::Serialization { .. })));
        let bad_author = json!({"ISBN:1": {"title": "t", "authors": [{"url": "x"}]}}).to_string();
        assert!(matches!(parse_lookup_response("1", bad_author.as_bytes()), Err(LibraryError::Serialization { .. })));
    }

    #[tokio::test]
    async fn test_should_lookup_over_http() {
        let base_url = spawn_open_library(vec![
            (HOBBIT_ISBN.to_string(), StatusCode::OK, hobbit_response()),
        ]).await;
        let client = OpenLibraryClient::new(base_url.as_str(), Duration::from_secs(5)).expect("should build client");
        let book = client.lookup(HOBBIT_ISBN).await.expect("should lookup").expect("should find book");
        assert_eq!("The Hobbit", book.title.as_str());
        assert_eq!(None, client.lookup("0000000000000").await.expect("should lookup"));
    }

    #[tokio::test]
    async fn test_should_fail_on_error_status() {
        let base_url = spawn_open_library(vec![
            ("0000000000000".to_string(), StatusCode::NOT_FOUND, json!({})),
        ]).await;
        let client = OpenLibraryClient::new(base_url.as_str(), Duration::from_secs(5)).expect("should build client");
        let res = client.lookup("0000000000000").await;
        assert!(matches!(res, Err(LibraryError::Upstream { reason_code: Some(ref code), .. }) if code == "404"));
    }

    #[tokio::test]
    async fn test_should_fail_on_unreachable_service() {
        let client = OpenLibraryClient::new("http://127.0.0.1:9/api/books", Duration::from_secs(2)).expect("should build client");
        assert!(matches!(client.lookup(HOBBIT_ISBN).await, Err(LibraryError::Upstream { .. })));
    }
}
