//! HTTP file transfer.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use indicatif::ProgressBar;
use reqwest::{header, Client, Response, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

use crate::error::{Error, Result};
use crate::fs::{filename_from_disposition, partial_path, sanitize_filename};
use crate::output::create_download_bar;
use crate::transfer::{FetchedFile, Transfer};

/// User agent sent with every request.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Streams files over HTTP with a bounded wait on every network step.
pub struct HttpTransfer {
    client: Client,
    timeout: Duration,
    show_progress: bool,
}

impl HttpTransfer {
    /// Create a new HTTP transfer.
    ///
    /// `timeout` bounds connecting, receiving the response headers and every
    /// body read, so a stalled server cannot hold the batch.
    pub fn new(timeout: Duration, show_progress: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| Error::Download(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout,
            show_progress,
        })
    }

    /// Send a GET request and check the response status.
    async fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);

        let response = timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| Error::Timeout(self.timeout.as_secs()))??;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(url.to_string()));
        }

        if !status.is_success() {
            return Err(Error::Download(format!("HTTP {} for {}", status, url)));
        }

        Ok(response)
    }

    /// Stream a response body to `path`, returning the number of bytes written.
    ///
    /// `progress` is cleared whether or not the transfer succeeds.
    async fn stream_to_file(
        &self,
        response: Response,
        path: &Path,
        expected: u64,
        progress: &ProgressBar,
    ) -> Result<u64> {
        let written = self.write_body(response, path, progress).await;
        progress.finish_and_clear();
        let downloaded = written?;

        if downloaded != expected {
            return Err(Error::Download(format!(
                "Received {} of {} bytes",
                downloaded, expected
            )));
        }

        Ok(downloaded)
    }

    fn progress_bar(&self, expected: u64) -> ProgressBar {
        if self.show_progress {
            create_download_bar(expected)
        } else {
            ProgressBar::hidden()
        }
    }

    async fn write_body(
        &self,
        response: Response,
        path: &Path,
        progress: &ProgressBar,
    ) -> Result<u64> {
        let mut file = File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        loop {
            let next = timeout(self.timeout, stream.next())
                .await
                .map_err(|_| Error::Timeout(self.timeout.as_secs()))?;
            let Some(chunk) = next else {
                break;
            };

            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            progress.set_position(downloaded);
        }

        file.flush().await?;
        Ok(downloaded)
    }
}

#[async_trait]
impl Transfer for HttpTransfer {
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<FetchedFile> {
        let response = self.get(url).await?;

        // The server names the file; without a disposition there is no file.
        let filename = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(filename_from_disposition)
            .ok_or_else(|| Error::NotFound(url.to_string()))?;
        let filename = sanitize_filename(&filename)?;

        let expected = response.content_length().ok_or_else(|| {
            Error::Download(format!("No Content-Length declared for {}", url))
        })?;

        let output_path = dest_dir.join(&filename);
        let partial = partial_path(dest_dir, &filename);

        let progress = self.progress_bar(expected);
        match self.stream_to_file(response, &partial, expected, &progress).await {
            Ok(bytes) => {
                tokio::fs::rename(&partial, &output_path).await?;
                Ok(FetchedFile {
                    path: output_path,
                    bytes,
                })
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                Err(e)
            }
        }
    }
}
