use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

const CONFIG_DIR_PREFIX: &str = "zoho-sheet";
const DEFAULT_DATA_CENTER: &str = "com";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub zoho: Credentials,
}

/// Client identity and token material for one Zoho account.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default = "default_data_center")]
    pub data_center: String,
    /// Overrides the `https://accounts.zoho.{dc}` root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts_url: Option<String>,
    /// Overrides the `https://sheet.zoho.{dc}/api/v2/` root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

fn default_data_center() -> String {
    DEFAULT_DATA_CENTER.to_string()
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            device_code: None,
            access_token: None,
            refresh_token: None,
            data_center: default_data_center(),
            accounts_url: None,
            api_url: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    pub fn with_device_code(mut self, device_code: impl Into<String>) -> Self {
        self.device_code = Some(device_code.into());
        self
    }

    pub fn with_data_center(mut self, data_center: impl Into<String>) -> Self {
        self.data_center = data_center.into();
        self
    }

    /// Data center suffix, e.g. `com`, `eu`, `in`. Never empty.
    pub fn data_center(&self) -> &str {
        match self.data_center.trim() {
            "" => DEFAULT_DATA_CENTER,
            dc => dc,
        }
    }

    pub fn with_endpoints(
        mut self,
        accounts_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        self.accounts_url = Some(accounts_url.into());
        self.api_url = Some(api_url.into());
        self
    }

    fn accounts_root(&self) -> String {
        match self.accounts_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("https://accounts.zoho.{}", self.data_center()),
        }
    }

    /// Always ends in `/` so relative paths join beneath it.
    pub fn api_base_url(&self) -> String {
        match self.api_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => format!("{}/", url.trim_end_matches('/')),
            _ => format!("https://sheet.zoho.{}/api/v2/", self.data_center()),
        }
    }

    pub fn token_url(&self) -> String {
        format!("{}/oauth/v2/token", self.accounts_root())
    }

    pub fn device_token_url(&self) -> String {
        format!("{}/oauth/v3/device/token", self.accounts_root())
    }

    pub fn device_code_url(&self) -> String {
        format!("{}/oauth/v3/device/code", self.accounts_root())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file()?;

        if !config_path.exists() {
            return Err(SheetError::Config(format!(
                "Config file not found at {:?}. Please create one.",
                config_path
            )));
        }

        let contents = fs::read_to_string(&config_path)?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| SheetError::Config(format!("Failed to parse config: {}", e)))?;

        if config.zoho.client_id.is_empty() || config.zoho.client_secret.is_empty() {
            return Err(SheetError::Config(
                "Zoho client_id and client_secret must be set in config file".to_string(),
            ));
        }

        if config.zoho.data_center.trim().is_empty() {
            return Err(SheetError::Config(
                "Zoho data_center cannot be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Write the config back to disk, readable by the owner only.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    fn save_to(&self, config_path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SheetError::Config(format!("Failed to serialize config: {}", e)))?;

        let mut options = OpenOptions::new();
        options.create(true).write(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(config_path)
            .map_err(|e| SheetError::Config(format!("Failed to open config file: {}", e)))?;

        // `mode` only applies to newly created files.
        #[cfg(unix)]
        file.set_permissions(fs::Permissions::from_mode(0o600))?;

        file.write_all(contents.as_bytes())?;

        Ok(())
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        let xdg_dirs = Self::xdg_dirs();
        xdg_dirs
            .place_config_file("config.toml")
            .map_err(|e| SheetError::Config(format!("Failed to create config directory: {}", e)))
    }
}
