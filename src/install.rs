use crate::config::InstallerSettings;
use crate::error::{DownloadFailure, FsStep, InstallError};
use crate::fetch::AssetFetcher;
use crate::fs::FileSystem;
use crate::github::build_asset_url;
use crate::types::InstallPlan;
use std::path::{Path, PathBuf};

/// Install the planned binary and return its final path.
///
/// Steps run in order and the first failure aborts the rest. The download
/// lands in a staging file that is only renamed over the target once it is
/// complete and executable.
pub async fn install_binary<F, S>(
    plan: &InstallPlan,
    settings: &InstallerSettings,
    fetcher: &F,
    fs: &S,
) -> Result<PathBuf, InstallError>
where
    F: AssetFetcher,
    S: FileSystem,
{
    fs.create_dir_all(&plan.install_dir)
        .map_err(|e| InstallError::filesystem(FsStep::CreateDir, &plan.install_dir, e))?;

    let target = plan.target_path();
    if fs.is_file(&target) {
        tracing::info!("Removing existing binary at {}", target.display());
        fs.remove_file(&target)
            .map_err(|e| InstallError::filesystem(FsStep::RemoveExisting, &target, e))?;
    }

    let url = build_asset_url(settings, &plan.version, plan.asset);
    let download_error = |source: DownloadFailure| InstallError::Download {
        url: url.clone(),
        version: plan.version.clone(),
        asset: plan.asset.to_string(),
        source,
    };

    let bytes = fetcher
        .fetch_asset(&url)
        .await
        .map_err(|e| download_error(e.into()))?;
    if bytes.is_empty() {
        return Err(download_error(DownloadFailure::Empty));
    }

    let staging = plan.staging_path();
    if let Err(e) = place_binary(fs, &staging, &target, &bytes) {
        discard_staging(fs, &staging);
        return Err(e);
    }

    tracing::info!(
        "Installed {} {} to {}",
        plan.asset,
        plan.version,
        target.display()
    );
    Ok(target)
}

fn place_binary<S: FileSystem>(
    fs: &S,
    staging: &Path,
    target: &Path,
    bytes: &[u8],
) -> Result<(), InstallError> {
    fs.write_file(staging, bytes)
        .map_err(|e| InstallError::filesystem(FsStep::WriteStaging, staging, e))?;
    fs.set_executable(staging)
        .map_err(|e| InstallError::filesystem(FsStep::SetExecutable, staging, e))?;
    fs.rename(staging, target)
        .map_err(|e| InstallError::filesystem(FsStep::Rename, target, e))?;
    Ok(())
}

fn discard_staging<S: FileSystem>(fs: &S, staging: &Path) {
    if fs.is_file(staging) {
        if let Err(e) = fs.remove_file(staging) {
            tracing::warn!(
                "Could not remove staging file {}: {}",
                staging.display(),
                e
            );
        }
    }
}
