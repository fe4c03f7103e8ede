use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::StatusCode;
use thiserror::Error;

/// Upper bound on the buffer reserved up front from `Content-Length`.
const MAX_PREALLOC: u64 = 64 << 20;

const PROGRESS_TEMPLATE: &str =
    "{msg} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("server responded with {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// HTTP capability used by the resolver and the installer.
pub trait AssetFetcher {
    /// GET a JSON document from the release API.
    async fn fetch_json(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    /// GET the raw bytes of a release asset.
    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    token: Option<String>,
    show_progress: bool,
}

impl HttpFetcher {
    pub fn new(token: Option<String>, show_progress: bool) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("km-install/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            token,
            show_progress,
        })
    }

    fn progress_bar(&self, total_size: u64, label: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total_size);
        if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message(format!("Downloading {}", label));
        pb
    }
}

impl AssetFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!("Fetching release metadata from: {}", url);

        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
            tracing::debug!("Using GITHUB_TOKEN");
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::info!("Downloading {}...", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let total_size = response.content_length().unwrap_or(0);
        let label = url.rsplit('/').next().unwrap_or(url);
        let pb = self.progress_bar(total_size, label);

        let reserve = usize::try_from(total_size.min(MAX_PREALLOC)).unwrap_or(0);
        let mut body = Vec::with_capacity(reserve);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            body.extend_from_slice(&chunk);
            pb.set_position(body.len() as u64);
        }

        pb.finish_with_message("Download complete");
        tracing::debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
