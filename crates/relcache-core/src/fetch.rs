//! Finding the newest compatible release of a tool and caching its asset.

use std::{
    future::Future,
    path::{Path, PathBuf},
    pin::Pin,
    sync::Arc,
    task::{ready, Context, Poll},
};

use futures_util::Stream;
use semver::Version;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    error::FetchError,
    format::human_readable_size,
    fs::{file_len, write_replacing},
    paths::CachePaths,
    progress::{DownloadProgress, MappedSender, Notification, ProgressSender},
    release::select_release,
    tool::ToolDescriptor,
    transport::ReleaseTransport,
    NOTIFICATION_BUFFER,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOutcome {
    /// A complete copy was already cached, nothing was downloaded.
    Cached { path: PathBuf, version: Version },
    Downloaded {
        path: PathBuf,
        version: Version,
        size: u64,
    },
}

impl CacheOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Cached { path, .. } | Self::Downloaded { path, .. } => path,
        }
    }

    pub fn version(&self) -> &Version {
        match self {
            Self::Cached { version, .. } | Self::Downloaded { version, .. } => version,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached { .. })
    }
}

#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn ReleaseTransport>,
    paths: Arc<dyn CachePaths>,
}

impl Fetcher {
    pub fn new(transport: impl ReleaseTransport + 'static, paths: impl CachePaths + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            paths: Arc::new(paths),
        }
    }

    pub fn from_shared(transport: Arc<dyn ReleaseTransport>, paths: Arc<dyn CachePaths>) -> Self {
        Self { transport, paths }
    }

    /// Starts fetching `tool` in the background.
    ///
    /// The returned stream yields notifications in order and ends after the
    /// asset is cached. A failure is yielded as the last item. Dropping the
    /// stream aborts the work.
    ///
    /// Must be called within a tokio runtime.
    pub fn fetch_and_cache(&self, tool: ToolDescriptor) -> ProgressStream {
        let (tx, rx) = mpsc::channel(NOTIFICATION_BUFFER);
        let fetcher = self.clone();

        let handle = tokio::spawn(async move {
            let channel: &dyn ProgressSender<Result<Notification, FetchError>> = &tx;
            let sender = MappedSender::new(channel, Ok);
            match fetcher.run(&tool, &sender).await {
                Ok(outcome) => Some(outcome),
                Err(err) => {
                    let _ = tx.send(Err(err)).await;
                    None
                }
            }
        });

        ProgressStream {
            receiver: rx,
            handle: Some(handle),
            outcome: None,
        }
    }

    /// Makes sure the newest release of `tool` matching its major version is cached.
    #[tracing::instrument(skip_all, fields(tool = %tool.name, major = tool.major_version))]
    pub async fn run(
        &self,
        tool: &ToolDescriptor,
        sender: &dyn ProgressSender<Notification>,
    ) -> Result<CacheOutcome, FetchError> {
        tool.validate()?;

        sender.update(Notification::fetching_tool_info(&tool.name)).await;

        let releases = self.transport.releases(&tool.release_url).await?;
        debug!(count = releases.len(), "Fetched releases");

        let (release, version) = select_release(releases, tool.major_version, tool.include_prereleases)
            .ok_or_else(|| FetchError::ReleaseNotFound {
                tool: tool.name.clone(),
                major: tool.major_version,
            })?;

        info!(tag = %release.tag_name, %version, "Selected release");

        let asset = release.primary_asset().ok_or_else(|| FetchError::NoAssets {
            tool: tool.name.clone(),
            tag: release.tag_name.clone(),
        })?;

        let path = self.paths.cache_path(&asset.name)?;

        if file_len(&path).await? == Some(asset.size) {
            debug!(
                "Latest supported {} version {} is already cached ({})",
                tool.name,
                version,
                human_readable_size(asset.size)
            );
            return Ok(CacheOutcome::Cached { path, version });
        }

        let progress = MappedSender::filter_map(sender, |progress: DownloadProgress| {
            (progress.total != 0).then(|| Notification::downloading_release(tool.name.as_str(), progress))
        });

        let bytes = self.transport.download(&asset.browser_download_url, &progress).await?;
        let size = bytes.len() as u64;

        debug!("Finished downloading {}", asset.name);

        if size != asset.size {
            warn!(
                declared = asset.size,
                received = size,
                "Downloaded size of {} differs from the size listed in the release",
                asset.name
            );
            return Err(FetchError::SizeMismatch {
                name: asset.name.clone(),
                expected: asset.size,
                received: size,
            });
        }

        write_replacing(&bytes, &path).await?;

        debug!("Saved {} to {}", asset.name, path.display());

        Ok(CacheOutcome::Downloaded { path, version, size })
    }
}

/// Notifications of a running [`Fetcher::fetch_and_cache`] call.
pub struct ProgressStream {
    receiver: mpsc::Receiver<Result<Notification, FetchError>>,
    handle: Option<JoinHandle<Option<CacheOutcome>>>,
    outcome: Option<CacheOutcome>,
}

impl ProgressStream {
    /// Available once the stream has ended successfully.
    pub fn outcome(&self) -> Option<&CacheOutcome> {
        self.outcome.as_ref()
    }
}

impl Stream for ProgressStream {
    type Item = Result<Notification, FetchError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(item) = ready!(self.receiver.poll_recv(cx)) {
            return Poll::Ready(Some(item));
        }

        let Some(handle) = self.handle.as_mut() else {
            return Poll::Ready(None);
        };

        let result = ready!(Pin::new(handle).poll(cx));
        self.handle = None;

        match result {
            Ok(outcome) => {
                self.outcome = outcome;
                Poll::Ready(None)
            }
            Err(err) => Poll::Ready(Some(Err(err.into()))),
        }
    }
}

impl Drop for ProgressStream {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}
