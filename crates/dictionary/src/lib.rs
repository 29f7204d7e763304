use std::sync::{Arc, OnceLock};
use std::time::Duration;

use dictionary_api::{get_definition, DICTIONARY_API_URL};
use reqwest::Url;

mod dictionary;
mod dictionary_api;
mod status;

pub use dictionary::{Definition, Meaning, Phonetic, WordDefinition};
pub use status::{LookupStateMachine, LookupStatus, RequestId, Snapshot};

pub const DEFAULT_BASE_URL: &str = DICTIONARY_API_URL;

/// A failed lookup.
///
/// Network failures, non-success responses and malformed payloads all end up
/// here. The cause is kept for logging only.
#[derive(Debug, thiserror::Error)]
#[error("error retrieving data")]
pub struct LookupError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl LookupError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(error: reqwest::Error) -> Self {
        Self::new(error)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build http client")]
    Build(#[from] reqwest::Error),
}

/// Resolves a word into its dictionary entries.
#[async_trait::async_trait]
pub trait Lookup: Send + Sync {
    async fn lookup(&self, word: &str) -> Result<Vec<WordDefinition>, LookupError>;
}

#[derive(Debug, Clone)]
pub struct Dictionary {
    client: reqwest::Client,
    base_url: Url,
}

static SHARED: OnceLock<Arc<Dictionary>> = OnceLock::new();

impl Dictionary {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
        }
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Gives up on requests that take longer than `timeout` as a whole.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Uses a preconfigured http client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };
        let base_url = Url::parse(base_url).map_err(|error| invalid(error.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("url cannot hold path segments".to_owned()));
        }
        Ok(Self { client, base_url })
    }

    /// The process-wide client, built on first use.
    pub fn shared() -> Arc<Dictionary> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Dictionary::new())))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub async fn get_definition(&self, word: &str) -> Result<Vec<WordDefinition>, LookupError> {
        get_definition(&self.client, &self.base_url, word).await
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Lookup for Dictionary {
    async fn lookup(&self, word: &str) -> Result<Vec<WordDefinition>, LookupError> {
        self.get_definition(word).await
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio::time::timeout;

    use super::*;

    const CAT: &str = r#"[
        {"word":"cat","phonetic":"/kæt/","meanings":[{"partOfSpeech":"noun","definitions":[{"definition":"A small domesticated carnivorous mammal."}]}]},
        {"word":"cat","meanings":[{"partOfSpeech":"verb","definitions":[{"definition":"To hoist the anchor.","example":"cat the anchor"}]}]}
    ]"#;

    /// Answers a single request with a canned response and reports the
    /// request line it received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).into_owned();
            let request_line = request.lines().next().unwrap_or_default().to_owned();
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = tx.send(request_line);
        });
        (format!("http://{addr}/api/v2/entries/en/"), rx)
    }

    #[tokio::test]
    async fn returns_entries_in_order() {
        let (base, request) = serve_once("200 OK", CAT).await;
        let dict = Dictionary::with_base_url(&base).unwrap();

        let words = dict.lookup("cat").await.unwrap();

        assert_eq!(words.len(), 2);
        assert_eq!(words[0].meanings[0].part_of_speech, "noun");
        assert_eq!(words[1].meanings[0].part_of_speech, "verb");
        assert_eq!(
            request.await.unwrap(),
            "GET /api/v2/entries/en/cat HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn word_is_sent_as_one_encoded_segment() {
        let (base, request) = serve_once("200 OK", "[]").await;
        let dict = Dictionary::with_base_url(&base).unwrap();

        let words = dict.lookup("ice cream").await.unwrap();

        assert!(words.is_empty());
        assert_eq!(
            request.await.unwrap(),
            "GET /api/v2/entries/en/ice%20cream HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn not_found_is_an_error() {
        let body = r#"{"title":"No Definitions Found","message":"Sorry pal","resolution":"Try again"}"#;
        let (base, _request) = serve_once("404 Not Found", body).await;
        let dict = Dictionary::with_base_url(&base).unwrap();

        let error = dict.lookup("qwertyuiop").await.unwrap_err();

        assert_eq!(error.to_string(), "error retrieving data");
        assert!(error.source().is_some());
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let (base, _request) = serve_once("200 OK", r#"{"word":"cat"}"#).await;
        let dict = Dictionary::with_base_url(&base).unwrap();

        assert!(dict.lookup("cat").await.is_err());
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let dict = Dictionary::with_base_url(&format!("http://{addr}/")).unwrap();

        assert!(dict.lookup("cat").await.is_err());
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            Dictionary::with_base_url("not a url"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            Dictionary::with_base_url("mailto:someone@example.com"),
            Err(ClientError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn shared_client_is_built_once() {
        let first = Dictionary::shared();
        let second = Dictionary::shared();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.base_url(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn dot_words_fail_without_a_request() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let dict = Dictionary::with_base_url(&format!("http://{addr}/en/")).unwrap();

        assert!(dict.lookup(".").await.is_err());
        assert!(dict.lookup("..").await.is_err());
        let accepted = timeout(Duration::from_millis(100), listener.accept()).await;
        assert!(accepted.is_err(), "no connection expected");
    }
}
