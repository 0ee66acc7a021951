use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001";

/// Overrides `server_url` from the config file.
pub const SERVER_URL_ENV: &str = "VERBLIX_SERVER_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Schema version. Missing means a hand-written file.
    #[serde(default)]
    pub config_version: u32,
    pub server_url: String,
    /// Where local chat storage lives; `None` means the platform data
    /// directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    pub created_at: jiff::Timestamp,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            server_url: DEFAULT_SERVER_URL.to_string(),
            data_dir: None,
            created_at: jiff::Timestamp::now(),
        }
    }
}

impl ClientConfig {
    /// Directory holding the chat registry: `<data_dir>/verblix/storage`.
    pub fn storage_dir(&self) -> eyre::Result<PathBuf> {
        let base = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir().ok_or_else(|| eyre::eyre!("no data directory found"))?,
        };
        Ok(base.join("verblix").join("storage"))
    }

    /// Apply environment overrides.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(SERVER_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.server_url = url;
        }
        self
    }
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("verblix"))
}

/// Load the config from the platform config directory, writing a default
/// one on first run.
pub fn load_or_init() -> eyre::Result<ClientConfig> {
    let dir = config_dir()?;
    let path = dir.join("config.json");
    if path.exists() {
        return load_config(&path);
    }

    let config = ClientConfig::default();
    save_config(&dir, &config)?;
    Ok(config)
}

/// Read a config file, upgrading older layouts on the fly.
pub fn load_config(path: &Path) -> eyre::Result<ClientConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&raw)?;
    let version = json
        .get("config_version")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0) as u32;

    Ok(serde_json::from_value(migrate(json, version)?)?)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update verblix-chat."
        ));
    }

    // Version 1 is the first released layout. A file without a version is
    // one written by hand: fill in what it leaves out and stamp it.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("server_url")
            .or_insert(serde_json::Value::String(DEFAULT_SERVER_URL.to_string()));
        obj.entry("created_at")
            .or_insert(serde_json::Value::String(jiff::Timestamp::now().to_string()));
        obj.insert("config_version".to_string(), CURRENT_VERSION.into());
        tracing::info!("stamped unversioned config as v1");
    }

    // Future migrations go here, one `if from_version < N` step per bump.

    Ok(json)
}

/// Write `config.json` into `dir`, stamped with the current version.
pub fn save_config(dir: &Path, config: &ClientConfig) -> eyre::Result<()> {
    let stamped = ClientConfig {
        config_version: CURRENT_VERSION,
        ..config.clone()
    };
    let path = dir.join("config.json");
    write_private(&path, serde_json::to_string_pretty(&stamped)?.as_bytes())?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

/// Replace `path` atomically with an owner-only file.
fn write_private(path: &Path, contents: &[u8]) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("{} has no parent directory", path.display()))?;
    std::fs::create_dir_all(dir)?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}
