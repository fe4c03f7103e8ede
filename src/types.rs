use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Name of the installed executable.
pub const TOOL_NAME: &str = "km";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    X86_64,
    Aarch64,
}

impl Asset {
    pub fn file_name(&self) -> &'static str {
        match self {
            Asset::X86_64 => "km-x86_64",
            Asset::Aarch64 => "km-aarch64",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GitHubRelease {
    pub tag_name: String,
}

/// Everything the installer needs, computed once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub version: String,
    pub install_dir: PathBuf,
    pub asset: Asset,
}

impl InstallPlan {
    pub fn target_path(&self) -> PathBuf {
        self.install_dir.join(TOOL_NAME)
    }

    /// Hidden file next to the target that receives the download.
    pub fn staging_path(&self) -> PathBuf {
        self.install_dir
            .join(format!(".{}.{}.download", TOOL_NAME, std::process::id()))
    }
}
