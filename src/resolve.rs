//! Turns process arguments and environment into an [`InstallPlan`].
//!
//! Everything here is pure apart from the single latest-release lookup,
//! which goes through the [`AssetFetcher`] capability.

use crate::config::InstallerSettings;
use crate::error::InstallError;
use crate::fetch::AssetFetcher;
use crate::github::{build_latest_release_url, parse_release_tag};
use crate::types::{Asset, InstallPlan};
use std::path::{Path, PathBuf};

pub const USER_FLAG: &str = "--user";
const VERSION_MARKER: &str = "--version";

/// Version requested on the command line, `None` meaning "latest".
///
/// Every token containing `--version` replaces the previous candidate with
/// the text after its first `=`, so the last such token wins. A token
/// without `=` (or with nothing after it) requests the latest release.
pub fn requested_version(args: &[String]) -> Option<String> {
    let mut version = String::new();
    for arg in args {
        if arg.contains(VERSION_MARKER) {
            version = arg
                .split_once('=')
                .map(|(_, value)| value.to_string())
                .unwrap_or_default();
        }
    }
    (!version.is_empty()).then_some(version)
}

pub async fn resolve_version<F: AssetFetcher>(
    args: &[String],
    settings: &InstallerSettings,
    fetcher: &F,
) -> Result<String, InstallError> {
    if let Some(version) = requested_version(args) {
        tracing::debug!("Using requested version {}", version);
        return Ok(version);
    }

    let url = build_latest_release_url(settings);
    tracing::info!("No version requested, resolving latest release");

    let body = fetcher
        .fetch_json(&url)
        .await
        .map_err(|e| InstallError::MetadataFetch {
            url: url.clone(),
            source: e.into(),
        })?;
    let tag = parse_release_tag(&body).map_err(|source| InstallError::MetadataFetch {
        url: url.clone(),
        source,
    })?;

    tracing::info!("Latest release is {}", tag);
    Ok(tag)
}

/// `{home}/.local/bin` when `--user` is present, `system_dir` otherwise.
pub fn resolve_install_dir(
    args: &[String],
    home: Option<&Path>,
    system_dir: &Path,
) -> Result<PathBuf, InstallError> {
    if !args.iter().any(|arg| arg == USER_FLAG) {
        return Ok(system_dir.to_path_buf());
    }

    match home {
        Some(home) if !home.as_os_str().is_empty() => Ok(home.join(".local").join("bin")),
        _ => Err(InstallError::Environment(
            "--user was given but HOME is not set, cannot locate the user bin directory"
                .to_string(),
        )),
    }
}

/// Release asset for an architecture string. Anything that is not an
/// aarch64 alias gets the x86_64 build.
pub fn resolve_asset(arch: &str) -> Asset {
    match arch.to_lowercase().as_str() {
        "aarch64" | "arm64" => Asset::Aarch64,
        "x86_64" | "amd64" => Asset::X86_64,
        other => {
            tracing::warn!(
                "Unrecognized architecture '{}', falling back to the x86_64 binary",
                other
            );
            Asset::X86_64
        }
    }
}

/// Resolve version, install directory and asset, in that order.
pub async fn resolve_plan<F: AssetFetcher>(
    args: &[String],
    home: Option<&Path>,
    settings: &InstallerSettings,
    fetcher: &F,
) -> Result<InstallPlan, InstallError> {
    let version = resolve_version(args, settings, fetcher).await?;
    let install_dir = resolve_install_dir(args, home, &settings.system_bin_dir)?;
    let asset = resolve_asset(settings.arch());

    Ok(InstallPlan {
        version,
        install_dir,
        asset,
    })
}
