use std::time::Duration;

use futures_util::stream::StreamExt;
use reqwest::{Client, Response};
use tracing::{debug, error};

use crate::{
    error::FetchError,
    progress::{DownloadProgress, ProgressSender},
    release::Release,
    RELCACHE_NAME, RELCACHE_VERSION,
};

/// Network access used by the fetcher.
#[async_trait::async_trait]
pub trait ReleaseTransport: Send + Sync {
    /// Fetches every release listed by the feed.
    async fn releases(&self, url: &str) -> Result<Vec<Release>, FetchError>;

    /// Downloads the whole body of `url`, reporting progress after every chunk.
    async fn download(
        &self,
        url: &str,
        sender: &dyn ProgressSender<DownloadProgress>,
    ) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    feed_timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            feed_timeout: None,
        }
    }

    /// Client with this crate's user agent. The GitHub API rejects requests without one.
    pub fn with_user_agent(user_agent: Option<&str>) -> Result<Self, FetchError> {
        let default_agent = format!("{RELCACHE_NAME}/{RELCACHE_VERSION}");
        let client = Client::builder()
            .user_agent(user_agent.unwrap_or(&default_agent))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| FetchError::network("", err))?;

        Ok(Self::new(client))
    }

    /// Timeout of the feed request. Asset downloads never time out.
    #[must_use]
    pub fn feed_timeout(mut self, timeout: Duration) -> Self {
        self.feed_timeout = Some(timeout);
        self
    }

    async fn get(&self, url: &str, timeout: Option<Duration>) -> Result<Response, FetchError> {
        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|err| {
            error!("Error occurred during request\nUrl: {}\nError: {}", url, err);
            FetchError::network(url, err)
        })?;

        response
            .error_for_status()
            .map_err(|err| FetchError::network(url, err))
    }
}

#[async_trait::async_trait]
impl ReleaseTransport for HttpTransport {
    async fn releases(&self, url: &str) -> Result<Vec<Release>, FetchError> {
        debug!(%url, "Fetching releases");

        let text = self
            .get(url, self.feed_timeout)
            .await?
            .text()
            .await
            .map_err(|err| FetchError::network(url, err))?;

        let mut deserializer = serde_json::Deserializer::from_str(&text);

        serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
            let path = e.path().to_string();
            FetchError::network(url, format!("Path: {}. Error: {}", path, e.into_inner()))
        })
    }

    async fn download(
        &self,
        url: &str,
        sender: &dyn ProgressSender<DownloadProgress>,
    ) -> Result<Vec<u8>, FetchError> {
        debug!(%url, "Downloading asset");

        let response = self.get(url, None).await?;
        let total = response.content_length().unwrap_or(0);

        let mut bytes = Vec::with_capacity(usize::try_from(total).unwrap_or_default());
        let mut stream = response.bytes_stream();

        while let Some(item) = stream.next().await {
            let chunk = item.map_err(|err| {
                error!("Error occurred during file downloading\nError: {}", err);
                FetchError::network(url, err)
            })?;

            bytes.extend_from_slice(&chunk);

            sender
                .update(DownloadProgress {
                    downloaded: bytes.len() as u64,
                    total,
                })
                .await;
        }

        Ok(bytes)
    }
}
