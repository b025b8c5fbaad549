use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, REFERER, USER_AGENT};

use crate::{FailureKind, FetchError};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub connect_timeout: Duration,
    /// Applies per read, so long streaming downloads are not cut off.
    pub read_timeout: Duration,
    pub redirect_limit: usize,
    pub bearer_token: Option<String>,
    pub user_agent: String,
    pub referer: Option<String>,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(60),
            redirect_limit: 10,
            bearer_token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub type ByteStream = BoxStream<'static, Result<Bytes, FetchError>>;

pub struct StreamResponse {
    pub status: u16,
    pub content_length: Option<u64>,
    pub body: ByteStream,
}

impl StreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP boundary of the pipeline. Authentication is attached by the
/// implementation; callers only see URLs, status codes and bodies.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;

    async fn get_stream(&self, url: &str) -> Result<StreamResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = settings.bearer_token.as_deref() {
            let mut value = header_value(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(USER_AGENT, header_value(&settings.user_agent)?);
        if let Some(referer) = settings.referer.as_deref() {
            headers.insert(REFERER, header_value(referer)?);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(settings.connect_timeout)
            .read_timeout(settings.read_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { client })
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, format!("{url}: {err}")))?;
        self.client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self.send(url).await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        Ok(HttpResponse { status, body })
    }

    async fn get_stream(&self, url: &str) -> Result<StreamResponse, FetchError> {
        let response = self.send(url).await?;
        let status = response.status().as_u16();
        let content_length = response.content_length();
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_reqwest_error))
            .boxed();
        Ok(StreamResponse {
            status,
            content_length,
            body,
        })
    }
}

fn header_value(raw: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(raw).map_err(|err| FetchError::new(FailureKind::InvalidHeader, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
