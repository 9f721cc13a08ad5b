#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
pub mod fetch;
pub mod progress;
pub mod release;
pub mod tool;
pub mod transport;

pub mod error;
pub mod format;

pub mod fs;
pub mod paths;

pub mod consts;

pub use consts::*;
pub use error::FetchError;
pub use fetch::{CacheOutcome, Fetcher, ProgressStream};
pub use format::human_readable_bytes;
pub use progress::{DownloadProgress, Notification, ProgressSender};
pub use release::{Asset, Release};
pub use tool::ToolDescriptor;
pub use transport::{HttpTransport, ReleaseTransport};
