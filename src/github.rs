//! Release host URLs and metadata parsing.

use crate::config::InstallerSettings;
use crate::error::MetadataFailure;
use crate::types::{Asset, GitHubRelease};

/// API URL of the latest published release.
pub fn build_latest_release_url(settings: &InstallerSettings) -> String {
    format!(
        "{}/repos/{}/{}/releases/latest",
        settings.api_base, settings.owner, settings.repo
    )
}

/// Download URL of `asset` attached to release `version`.
pub fn build_asset_url(settings: &InstallerSettings, version: &str, asset: Asset) -> String {
    format!(
        "{}/{}/{}/releases/download/{}/{}",
        settings.download_base,
        settings.owner,
        settings.repo,
        version,
        asset.file_name()
    )
}

/// Extract a non-empty `tag_name` from a release JSON body.
pub fn parse_release_tag(body: &[u8]) -> Result<String, MetadataFailure> {
    let release: GitHubRelease = serde_json::from_slice(body)?;
    if release.tag_name.trim().is_empty() {
        return Err(MetadataFailure::EmptyTag);
    }
    Ok(release.tag_name)
}
