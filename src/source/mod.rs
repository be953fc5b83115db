//! Producers of the URL sequence a load test consumes.
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{AppError, AppResult, HttpError};


/// Where the URLs of a run come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UrlSource {
    /// One URL, `count` times, or indefinitely when `count` is `None`.
    Repeat { url: String, count: Option<u64> },
    /// A fixed list, cycled until `count` URLs were emitted, or replayed once
    /// when `count` is `None`.
    List { urls: Vec<String>, count: Option<u64> },
}

impl UrlSource {
    /// Reads a list of URLs, one per line. Surrounding whitespace is trimmed
    /// and blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or holds no URL.
    pub fn from_file(path: &Path, count: Option<u64>) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            AppError::http(HttpError::ReadUrlFile {
                path: path.to_path_buf(),
                source: err,
            })
        })?;
        let urls: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        if urls.is_empty() {
            return Err(AppError::http(HttpError::UrlFileEmpty {
                path: PathBuf::from(path),
            }));
        }
        Ok(Self::List { urls, count })
    }

    /// Starts the producer task.
    ///
    /// The URL sequence closes once the source is exhausted or `cancel` fires;
    /// cancellation is not reported as an error. The error sequence closes
    /// together with the producer.
    #[must_use]
    pub fn spawn(
        self,
        capacity: usize,
        cancel: &CancellationToken,
    ) -> (flume::Receiver<String>, mpsc::Receiver<AppError>) {
        let (urls_tx, urls_rx) = flume::bounded::<String>(capacity.max(1));
        let (errors_tx, errors_rx) = mpsc::channel::<AppError>(1);
        let cancel = cancel.clone();
        let urls = self.into_urls();

        tokio::spawn(async move {
            let mut emitted: u64 = 0;
            for url in urls {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    sent = urls_tx.send_async(url) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                }
                emitted = emitted.saturating_add(1);
            }
            debug!(emitted, "URL source closed");
            drop(errors_tx);
        });

        (urls_rx, errors_rx)
    }

    fn into_urls(self) -> Box<dyn Iterator<Item = String> + Send> {
        match self {
            Self::Repeat {
                url,
                count: Some(count),
            } => Box::new(std::iter::repeat(url).take(to_usize(count))),
            Self::Repeat { url, count: None } => Box::new(std::iter::repeat(url)),
            Self::List {
                urls,
                count: Some(count),
            } => Box::new(urls.into_iter().cycle().take(to_usize(count))),
            Self::List { urls, count: None } => Box::new(urls.into_iter()),
        }
    }
}

fn to_usize(count: u64) -> usize {
    usize::try_from(count).unwrap_or(usize::MAX)
}
