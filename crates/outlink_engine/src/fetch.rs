use std::io::{self, Read};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::{Stream, TryStreamExt};
use reqwest::header::CONTENT_TYPE;
use tokio::runtime::Handle;
use tokio_util::io::{StreamReader, SyncIoBridge};

use crate::extract::PageSource;
use crate::{FailureKind, FetchError};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0";

type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// Response body as an async reader; nothing is buffered up front.
pub type BodyReader = StreamReader<ByteStream, Bytes>;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Covers the whole exchange, body included.
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    /// Upper bound on a declared Content-Length.
    pub max_bytes: u64,
    pub user_agent: String,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

pub struct PageStream {
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: BodyReader,
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn open(&self, url: &str) -> Result<PageStream, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn open(&self, url: &str) -> Result<PageStream, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let stream: ByteStream = Box::pin(response.bytes_stream().map_err(io::Error::other));
        Ok(PageStream {
            final_url,
            content_type,
            body: StreamReader::new(stream),
        })
    }
}

/// Serves pages from a [`Fetcher`] to the synchronous extraction pipeline.
///
/// `open` blocks on the runtime behind `handle`, so it must be called from a
/// blocking thread (for example inside `spawn_blocking`), never from a task.
pub struct BlockingPageSource<F> {
    fetcher: Arc<F>,
    handle: Handle,
}

impl<F: Fetcher> BlockingPageSource<F> {
    pub fn new(fetcher: Arc<F>, handle: Handle) -> Self {
        Self { fetcher, handle }
    }
}

impl<F: Fetcher + 'static> PageSource for BlockingPageSource<F> {
    fn open(&self, url: &str) -> io::Result<Box<dyn Read + Send>> {
        let page = self
            .handle
            .block_on(self.fetcher.open(url))
            .map_err(io::Error::other)?;
        Ok(Box::new(SyncIoBridge::new_with_handle(
            page.body,
            self.handle.clone(),
        )))
    }
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
