use crate::fetch::FetchError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Filesystem steps of an installation, used to label `Filesystem` errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsStep {
    CreateDir,
    RemoveExisting,
    WriteStaging,
    SetExecutable,
    Rename,
}

impl fmt::Display for FsStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FsStep::CreateDir => "create install directory",
            FsStep::RemoveExisting => "remove existing binary",
            FsStep::WriteStaging => "write downloaded binary",
            FsStep::SetExecutable => "mark binary executable",
            FsStep::Rename => "move binary into place",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum MetadataFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("response is not valid release JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("release has an empty tag_name")]
    EmptyTag,
}

#[derive(Debug, Error)]
pub enum DownloadFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("server returned an empty body")]
    Empty,
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("could not resolve the latest release from {url}: {source}")]
    MetadataFetch {
        url: String,
        #[source]
        source: MetadataFailure,
    },

    #[error("{0}")]
    Environment(String),

    #[error("failed to {step} at {}: {source}", .path.display())]
    Filesystem {
        step: FsStep,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to download {asset} ({version}) from {url}: {source}")]
    Download {
        url: String,
        version: String,
        asset: String,
        #[source]
        source: DownloadFailure,
    },
}

impl InstallError {
    pub fn filesystem(step: FsStep, path: impl Into<PathBuf>, source: io::Error) -> Self {
        InstallError::Filesystem {
            step,
            path: path.into(),
            source,
        }
    }
}
