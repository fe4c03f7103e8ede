use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub const APP_NAME: &str = "km-install";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CONFIG_PATH_ENV: &str = "KM_INSTALL_CONFIG";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InstallerSettings {
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_repo")]
    pub repo: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_download_base")]
    pub download_base: String,
    #[serde(default = "default_system_bin_dir")]
    pub system_bin_dir: PathBuf,
    /// Overrides the detected CPU architecture.
    #[serde(default)]
    pub arch: Option<String>,
}

fn default_owner() -> String {
    "moghtech".to_string()
}
fn default_repo() -> String {
    "komodo".to_string()
}
fn default_api_base() -> String {
    "https://api.github.com".to_string()
}
fn default_download_base() -> String {
    "https://github.com".to_string()
}
fn default_system_bin_dir() -> PathBuf {
    PathBuf::from("/usr/local/bin")
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            repo: default_repo(),
            api_base: default_api_base(),
            download_base: default_download_base(),
            system_bin_dir: default_system_bin_dir(),
            arch: None,
        }
    }
}

impl InstallerSettings {
    /// Apply `KM_INSTALL_*` overrides looked up through `var`.
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(owner) = var("KM_INSTALL_OWNER") {
            self.owner = owner;
        }
        if let Some(repo) = var("KM_INSTALL_REPO") {
            self.repo = repo;
        }
        if let Some(api_base) = var("KM_INSTALL_API_BASE") {
            self.api_base = api_base;
        }
        if let Some(download_base) = var("KM_INSTALL_DOWNLOAD_BASE") {
            self.download_base = download_base;
        }
        if let Some(dir) = var("KM_INSTALL_SYSTEM_DIR") {
            self.system_bin_dir = PathBuf::from(dir);
        }
        if let Some(arch) = var("KM_INSTALL_ARCH") {
            self.arch = Some(arch);
        }

        let trimmed = self.api_base.trim_end_matches('/').len();
        self.api_base.truncate(trimmed);
        let trimmed = self.download_base.trim_end_matches('/').len();
        self.download_base.truncate(trimmed);
    }

    /// Architecture string fed to asset selection.
    pub fn arch(&self) -> &str {
        self.arch.as_deref().unwrap_or(std::env::consts::ARCH)
    }
}

pub fn get_settings_file_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }
    let path = dirs::config_dir()?.join(APP_NAME).join(CONFIG_FILE_NAME);
    tracing::debug!("Settings file path: {}", path.display());
    Some(path)
}

pub fn parse_settings(content: &str) -> Result<InstallerSettings> {
    serde_json::from_str(content).with_context(|| "Could not parse settings file as JSON")
}

pub fn load_settings() -> Result<InstallerSettings> {
    let mut settings = match get_settings_file_path() {
        Some(path) if path.exists() => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Could not read settings file at {}", path.display()))?;
            parse_settings(&content)?
        }
        _ => InstallerSettings::default(),
    };

    settings.apply_overrides(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
    Ok(settings)
}
