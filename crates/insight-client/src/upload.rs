//! Dataset Upload
//!
//! The second transport path on the client. The generic call path cannot
//! observe upload progress, so this one streams the file body in fixed-size
//! chunks and reports cumulative progress after each chunk. Cancellation is
//! supported through an explicit token; a cancelled transfer is aborted and
//! yields no partial result.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use futures::{stream, Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error};

use crate::client::{request_url, InsightClient};
use crate::error::{ClientError, Result};
use crate::model::UploadOutcome;

const UPLOAD_ENDPOINT: &str = "/upload";

/// Body chunk size; one progress event fires per chunk
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Snapshot of upload progress
///
/// Emitted zero or more times while the body streams out, only when the
/// total size is a known positive number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadProgress {
    /// Bytes handed to the transport so far
    pub loaded: u64,

    /// Total body size in bytes
    pub total: u64,

    /// `round(loaded / total * 100)`
    pub percentage: u8,
}

impl UploadProgress {
    pub fn new(loaded: u64, total: u64) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            ((loaded as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            loaded,
            total,
            percentage,
        }
    }
}

/// Progress callback, invoked once per streamed chunk
pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// File handle for the upload path
#[derive(Clone, Debug)]
pub struct UploadFile {
    /// File name reported in the multipart field
    pub file_name: String,

    /// MIME type of the content
    pub content_type: String,

    /// File content
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, taking the name from the final path component
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        Ok(Self::new(file_name, "application/octet-stream", bytes))
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// Options for a single upload
#[derive(Clone, Default)]
pub struct UploadOptions {
    /// Progress callback
    pub on_progress: Option<ProgressCallback>,

    /// Cancellation token from [`cancel_pair`]
    pub cancel: Option<CancelToken>,
}

/// Create a linked cancel handle/token pair
///
/// The handle stays with whoever may abort the upload; the token goes into
/// [`UploadOptions`]. Firing the handle at any point before completion
/// aborts the transfer with [`ClientError::Cancelled`].
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// Sender half of a cancellation pair
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Fire the cancellation signal
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Receiver half of a cancellation pair
#[derive(Clone, Debug)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Whether the signal has already fired
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve when the signal fires
    ///
    /// Never resolves if the handle is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl InsightClient {
    /// Upload a dataset file with optional progress reporting and cancellation
    ///
    /// Builds a multipart body with a single `file` field and streams it so
    /// progress is observable. On success, resolves with the parsed response
    /// body. Each call owns its transport resources; concurrent uploads are
    /// independent.
    pub async fn upload_dataset(
        &self,
        file: UploadFile,
        options: UploadOptions,
    ) -> Result<UploadOutcome> {
        if let Some(cancel) = &options.cancel {
            if cancel.is_cancelled() {
                error!("Upload cancelled before start");
                return Err(ClientError::Cancelled);
            }
        }

        let transfer = self.send_upload(file, options.on_progress);

        match options.cancel {
            Some(mut cancel) => {
                tokio::select! {
                    () = cancel.cancelled() => {
                        error!("Upload cancelled");
                        Err(ClientError::Cancelled)
                    }
                    result = transfer => result,
                }
            }
            None => transfer.await,
        }
    }

    async fn send_upload(
        &self,
        file: UploadFile,
        on_progress: Option<ProgressCallback>,
    ) -> Result<UploadOutcome> {
        let token = self.resolve_token().await;
        let url = request_url(&self.config().base_url, UPLOAD_ENDPOINT);

        let total = file.bytes.len() as u64;
        let body = Body::wrap_stream(progress_chunks(file.bytes, on_progress));
        let part = Part::stream_with_length(body, total)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| {
                error!("Invalid upload content type: {e}");
                ClientError::Config(format!("invalid content type: {e}"))
            })?;
        let form = Form::new().part("file", part);

        debug!(%url, total, "uploading dataset");

        let mut request = self.http().post(url.as_str()).multipart(form);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            error!("Network error during upload: {e}");
            ClientError::Network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = status.canonical_reason().unwrap_or("Unknown").to_string();
            error!("Upload failed: HTTP {} {message}", status.as_u16());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await.map_err(|e| {
            error!("Failed to read upload response: {e}");
            ClientError::Network(e)
        })?;
        serde_json::from_str(&text).map_err(|e| {
            error!("Invalid upload response format: {e}");
            ClientError::InvalidResponse(e.to_string())
        })
    }
}

/// Chunk the file content into a byte stream, firing the progress callback
/// with cumulative counts after each chunk
fn progress_chunks(
    bytes: Vec<u8>,
    on_progress: Option<ProgressCallback>,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send + 'static {
    let total = bytes.len() as u64;
    let chunks: Vec<Bytes> = bytes
        .chunks(UPLOAD_CHUNK_SIZE)
        .map(Bytes::copy_from_slice)
        .collect();

    let mut loaded = 0u64;
    stream::iter(chunks).map(move |chunk| {
        loaded += chunk.len() as u64;
        if total > 0 {
            if let Some(on_progress) = &on_progress {
                on_progress(UploadProgress::new(loaded, total));
            }
        }
        Ok(chunk)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_percentage_rounds() {
        assert_eq!(UploadProgress::new(50, 200).percentage, 25);
        assert_eq!(UploadProgress::new(1, 3).percentage, 33);
        assert_eq!(UploadProgress::new(2, 3).percentage, 67);
        assert_eq!(UploadProgress::new(200, 200).percentage, 100);
    }

    #[test]
    fn test_percentage_zero_total() {
        assert_eq!(UploadProgress::new(0, 0).percentage, 0);
    }

    #[tokio::test]
    async fn test_progress_fires_per_chunk_with_cumulative_counts() {
        let bytes = vec![7u8; UPLOAD_CHUNK_SIZE * 2 + 100];
        let total = bytes.len() as u64;
        let seen: Arc<Mutex<Vec<UploadProgress>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Arc::new(move |progress| {
            sink.lock().unwrap().push(progress);
        });

        let chunks: Vec<_> = progress_chunks(bytes, Some(callback)).collect().await;
        assert_eq!(chunks.len(), 3);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.windows(2).all(|w| w[0].loaded < w[1].loaded));
        assert_eq!(seen.last().unwrap().loaded, total);
        assert_eq!(seen.last().unwrap().percentage, 100);
        assert!(seen.iter().all(|p| p.total == total));
    }

    #[tokio::test]
    async fn test_progress_silent_for_empty_content() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Arc::new(move |progress| {
            sink.lock().unwrap().push(progress);
        });

        let chunks: Vec<_> = progress_chunks(Vec::new(), Some(callback)).collect().await;
        assert!(chunks.is_empty());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_precancelled_upload_fails_without_sending() {
        let client = InsightClient::from_env();
        let (handle, token) = cancel_pair();
        handle.cancel();

        let file = UploadFile::new("sales.csv", "text/csv", b"a,b\n1,2\n".to_vec());
        let options = UploadOptions {
            on_progress: None,
            cancel: Some(token),
        };

        let result = client.upload_dataset(file, options).await;
        assert!(matches!(result, Err(ClientError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_token_wakes_waiter() {
        let (handle, mut token) = cancel_pair();
        assert!(!token.is_cancelled());

        let waiter = tokio::spawn(async move {
            token.cancelled().await;
            token.is_cancelled()
        });

        handle.cancel();
        assert!(waiter.await.unwrap());
    }

    #[tokio::test]
    async fn test_upload_file_from_path_uses_file_name() {
        let path = std::env::temp_dir().join("insight-client-upload-test.csv");
        tokio::fs::write(&path, b"a,b\n1,2\n").await.unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "insight-client-upload-test.csv");
        assert_eq!(file.bytes, b"a,b\n1,2\n");

        tokio::fs::remove_file(&path).await.ok();
    }
}
