use std::fmt::Display;

use crate::format::human_readable_size;

#[async_trait::async_trait]
pub trait ProgressSender<P: Send>: Sync + Send {
    /// It can technically return error but we will ignore them.
    async fn update(&self, data: P);
}

#[async_trait::async_trait]
impl<P: Send> ProgressSender<P> for tokio::sync::mpsc::Sender<P> {
    async fn update(&self, data: P) {
        let _ = self.send(data).await;
    }
}

#[async_trait::async_trait]
impl<P: Send> ProgressSender<P> for tokio::sync::mpsc::UnboundedSender<P> {
    async fn update(&self, data: P) {
        let _ = self.send(data);
    }
}

#[async_trait::async_trait]
impl<P: Send> ProgressSender<P> for std::sync::mpsc::Sender<P> {
    async fn update(&self, data: P) {
        let _ = self.send(data);
    }
}

pub struct MappedSender<'a, I, T> {
    inner: &'a dyn ProgressSender<T>,
    mapper: Box<dyn Fn(I) -> Option<T> + Sync + Send + 'a>,
}

#[async_trait::async_trait]
impl<'a, I: Send, T: Send> ProgressSender<I> for MappedSender<'a, I, T> {
    async fn update(&self, data: I) {
        if let Some(mapped) = (self.mapper)(data) {
            self.inner.update(mapped).await;
        }
    }
}

impl<'a, I, T> MappedSender<'a, I, T> {
    pub fn new<F>(sender: &'a dyn ProgressSender<T>, mapper: F) -> Self
    where
        F: Fn(I) -> T + Sync + Send + 'a,
    {
        Self {
            inner: sender,
            mapper: Box::new(move |value| Some(mapper(value))),
        }
    }

    /// Like [`MappedSender::new`] but drops values the mapper returns `None` for.
    pub fn filter_map<F>(sender: &'a dyn ProgressSender<T>, mapper: F) -> Self
    where
        F: Fn(I) -> Option<T> + Sync + Send + 'a,
    {
        Self {
            inner: sender,
            mapper: Box::new(mapper),
        }
    }
}

/// Raw progress of a single download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub downloaded: u64,
    /// `0` when the server didn't report a content length.
    pub total: u64,
}

/// A localizable progress message.
///
/// Every message has a template with `%N` slots, see [`Notification::template`]
/// and [`Notification::slots`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    FetchingToolInfo {
        tool: String,
    },
    DownloadingRelease {
        tool: String,
        downloaded: u64,
        total: u64,
    },
}

impl Notification {
    pub fn fetching_tool_info(tool: impl Into<String>) -> Self {
        Self::FetchingToolInfo { tool: tool.into() }
    }

    pub fn downloading_release(tool: impl Into<String>, progress: DownloadProgress) -> Self {
        Self::DownloadingRelease {
            tool: tool.into(),
            downloaded: progress.downloaded,
            total: progress.total,
        }
    }

    /// Key of the message in a translation table.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FetchingToolInfo { .. } => "fetchingToolInfo",
            Self::DownloadingRelease { .. } => "downloadingRelease",
        }
    }

    /// English template.
    pub fn template(&self) -> &'static str {
        match self {
            Self::FetchingToolInfo { .. } => "Fetching %0 release info",
            Self::DownloadingRelease { .. } => "Downloading %0: %1 / %2",
        }
    }

    pub fn slots(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::FetchingToolInfo { tool } => vec![("%0", tool.clone())],
            Self::DownloadingRelease {
                tool,
                downloaded,
                total,
            } => vec![
                ("%0", tool.clone()),
                ("%1", human_readable_size(*downloaded)),
                ("%2", human_readable_size(*total)),
            ],
        }
    }

    /// Substitutes the slots into `template`.
    pub fn render(&self, template: &str) -> String {
        // Higher slots first so `%1` never eats the prefix of `%10`.
        self.slots()
            .into_iter()
            .rev()
            .fold(template.to_owned(), |acc, (slot, value)| acc.replace(slot, &value))
    }

    pub fn downloaded(&self) -> Option<u64> {
        match self {
            Self::DownloadingRelease { downloaded, .. } => Some(*downloaded),
            Self::FetchingToolInfo { .. } => None,
        }
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(self.template()))
    }
}
