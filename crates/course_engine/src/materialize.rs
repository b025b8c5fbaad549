use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use engine_logging::{engine_debug, engine_info};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::transport::Transport;
use crate::types::{IngestEvent, ProgressSink};
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    AlreadyPresent,
    Downloaded { bytes: u64 },
}

#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("download of {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Downloads remote resources to local paths, at most once per path.
pub struct Materializer {
    transport: Arc<dyn Transport>,
}

impl Materializer {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Streams `url` into `destination` unless that file already exists.
    ///
    /// The body goes to a temporary sibling first, so a failed download
    /// leaves nothing behind and a concurrent writer is never clobbered.
    pub async fn fetch(
        &self,
        url: &str,
        destination: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<Materialized, MaterializeError> {
        if destination.exists() {
            engine_debug!("Skipping existing file {}", destination.display());
            return Ok(Materialized::AlreadyPresent);
        }

        let file_name = destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let fetch_error = |source: FetchError| MaterializeError::Fetch {
            url: url.to_string(),
            source,
        };
        let io_error = |path: &Path, source: io::Error| MaterializeError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut response = self.transport.get_stream(url).await.map_err(fetch_error)?;
        if !response.is_success() {
            return Err(fetch_error(FetchError::new(
                FailureKind::HttpStatus(response.status),
                format!("GET {url}"),
            )));
        }

        let directory = destination
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let partial = tempfile::Builder::new()
            .prefix(".partial-")
            .tempfile_in(directory)
            .map_err(|err| io_error(directory, err))?;
        let std_file = partial.reopen().map_err(|err| io_error(partial.path(), err))?;
        let mut file = tokio::fs::File::from_std(std_file);

        sink.emit(IngestEvent::ResourceStarted {
            file_name: file_name.clone(),
            total_bytes: response.content_length,
        });

        let mut written: u64 = 0;
        while let Some(chunk) = response.body.next().await {
            let chunk = chunk.map_err(fetch_error)?;
            file.write_all(&chunk)
                .await
                .map_err(|err| io_error(partial.path(), err))?;
            written += chunk.len() as u64;
            sink.emit(IngestEvent::ResourceProgress {
                file_name: file_name.clone(),
                bytes: written,
            });
        }
        file.flush().await.map_err(|err| io_error(partial.path(), err))?;
        file.sync_all().await.map_err(|err| io_error(partial.path(), err))?;
        drop(file);

        let outcome = match partial.persist_noclobber(destination) {
            Ok(_) => {
                engine_info!("Downloaded {} ({} bytes)", destination.display(), written);
                Materialized::Downloaded { bytes: written }
            }
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                engine_debug!("{} appeared during download, keeping it", destination.display());
                Materialized::AlreadyPresent
            }
            Err(err) => return Err(io_error(destination, err.error)),
        };

        sink.emit(IngestEvent::ResourceFinished {
            file_name,
            bytes: written,
        });
        Ok(outcome)
    }
}
