//! Word pair providers for the built-in textbook units.

use lingoflip_core::types::{GameLevel, WordPair};
use reqwest::{Client, Url};
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use tracing::{debug, info};

/// Provider errors.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),

    #[error("No words available for {0}")]
    UnknownUnit(GameLevel),
}

/// Source of word pairs for a built-in unit.
pub trait WordPairProvider {
    fn fetch(
        &self,
        unit: GameLevel,
    ) -> impl Future<Output = Result<Vec<WordPair>, ProviderError>> + Send;
}

/// Parse a provider response body: a JSON array of `{en, cn}` objects.
pub fn parse_pairs(body: &str) -> Result<Vec<WordPair>, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Fetches unit word lists over HTTP.
#[derive(Debug, Clone)]
pub struct HttpWordProvider {
    client: Client,
    base_url: Url,
}

impl HttpWordProvider {
    pub fn new(base_url: &str) -> Result<Self, ProviderError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// `{base}/units/{label}`, with the label percent-encoded.
    pub fn unit_url(&self, unit: GameLevel) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("units")
            .push(unit.label());
        Ok(url)
    }
}

impl WordPairProvider for HttpWordProvider {
    async fn fetch(&self, unit: GameLevel) -> Result<Vec<WordPair>, ProviderError> {
        let url = self.unit_url(unit)?;
        debug!(%url, "fetching word pairs");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Backend { status, message });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let pairs = parse_pairs(&body)?;
        info!(unit = %unit, pairs = pairs.len(), "fetched word pairs");
        Ok(pairs)
    }
}

/// Serves word lists held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticWordProvider {
    units: HashMap<GameLevel, Vec<WordPair>>,
}

impl StaticWordProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, unit: GameLevel, pairs: Vec<WordPair>) -> Self {
        self.units.insert(unit, pairs);
        self
    }

    /// Load from a JSON object mapping unit labels to pair lists.
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        let raw: HashMap<String, Vec<WordPair>> =
            serde_json::from_str(json).map_err(|e| ProviderError::Parse(e.to_string()))?;

        let mut units = HashMap::with_capacity(raw.len());
        for (label, pairs) in raw {
            let unit = GameLevel::from_label(&label)
                .ok_or_else(|| ProviderError::Parse(format!("unknown unit label: {}", label)))?;
            units.insert(unit, pairs);
        }
        Ok(Self { units })
    }

    pub fn from_file(path: &Path) -> Result<Self, ProviderError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::Parse(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn units(&self) -> impl Iterator<Item = GameLevel> + '_ {
        self.units.keys().copied()
    }
}

impl WordPairProvider for StaticWordProvider {
    async fn fetch(&self, unit: GameLevel) -> Result<Vec<WordPair>, ProviderError> {
        self.units
            .get(&unit)
            .cloned()
            .ok_or(ProviderError::UnknownUnit(unit))
    }
}

/// Provider picked from configuration.
#[derive(Debug, Clone)]
pub enum Provider {
    Http(HttpWordProvider),
    Static(StaticWordProvider),
}

impl WordPairProvider for Provider {
    async fn fetch(&self, unit: GameLevel) -> Result<Vec<WordPair>, ProviderError> {
        match self {
            Self::Http(p) => p.fetch(unit).await,
            Self::Static(p) => p.fetch(unit).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer one HTTP request with `response`. The task yields the request
    /// line it saw.
    async fn serve_once(response: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });
        (base, handle)
    }

    #[test]
    fn unit_url_encodes_label() {
        let provider = HttpWordProvider::new("http://localhost:8080/api/").unwrap();
        assert_eq!(
            provider.unit_url(GameLevel::Unit3).unwrap().as_str(),
            "http://localhost:8080/api/units/Unit%203"
        );

        let bare = HttpWordProvider::new("http://localhost:8080").unwrap();
        assert_eq!(
            bare.unit_url(GameLevel::Unit1).unwrap().as_str(),
            "http://localhost:8080/units/Unit%201"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            HttpWordProvider::new("not a url"),
            Err(ProviderError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpWordProvider::new("mailto:someone@example.com"),
            Err(ProviderError::InvalidUrl(_))
        ));
    }

    #[test]
    fn parse_pairs_body() {
        let pairs = parse_pairs(r#"[{"en":"apple","cn":"苹果"},{"en":"pear","cn":"梨"}]"#).unwrap();
        assert_eq!(pairs, vec![WordPair::new("apple", "苹果"), WordPair::new("pear", "梨")]);
        assert!(matches!(parse_pairs("{}"), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn static_provider_from_json() {
        let provider =
            StaticWordProvider::from_json(r#"{"Unit 1 补充": [{"en":"hi","cn":"你好"}]}"#).unwrap();
        assert_eq!(provider.units().collect::<Vec<_>>(), vec![GameLevel::Unit1Supplement]);

        assert!(matches!(
            StaticWordProvider::from_json(r#"{"Unit 9": []}"#),
            Err(ProviderError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn static_provider_fetch() {
        let provider = Provider::Static(
            StaticWordProvider::new().with_unit(GameLevel::Unit2, vec![WordPair::new("red", "红")]),
        );
        assert_eq!(provider.fetch(GameLevel::Unit2).await.unwrap().len(), 1);

        let err = provider.fetch(GameLevel::Unit4).await.unwrap_err();
        assert_eq!(err.to_string(), "No words available for Unit 4");
    }

    #[tokio::test]
    async fn http_fetch_parses_pairs() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 25\r\nConnection: close\r\n\r\n[{\"en\":\"cat\",\"cn\":\"猫\"}]",
        )
        .await;
        let provider = HttpWordProvider::new(&base).unwrap();

        let pairs = provider.fetch(GameLevel::Unit1).await.unwrap();
        assert_eq!(pairs, vec![WordPair::new("cat", "猫")]);
        assert_eq!(server.await.unwrap(), "GET /units/Unit%201 HTTP/1.1");
    }

    #[tokio::test]
    async fn http_error_status_keeps_body() {
        let (base, _server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 4\r\nConnection: close\r\n\r\nnope",
        )
        .await;
        let provider = HttpWordProvider::new(&base).unwrap();

        let err = provider.fetch(GameLevel::Unit2).await.unwrap_err();
        assert!(matches!(
            &err,
            ProviderError::Backend { status: 404, message } if message == "nope"
        ));
        assert_eq!(err.to_string(), "Provider error: 404 - nope");
    }

    #[tokio::test]
    async fn http_body_that_is_not_a_list_fails_to_parse() {
        let (base, _server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
        )
        .await;
        let provider = HttpWordProvider::new(&base).unwrap();

        let err = provider.fetch(GameLevel::Unit1).await.unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[tokio::test]
    async fn http_connection_refused_is_a_network_error() {
        let provider = HttpWordProvider::new("http://127.0.0.1:1").unwrap();
        let err = provider.fetch(GameLevel::Unit1).await.unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }
}
