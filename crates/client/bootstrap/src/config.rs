//! Bootstrap configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use modding::LoaderConfig;

/// Where mods live and how the orchestrator behaves.
#[derive(Clone, Debug)]
pub struct BootstrapConfig {
    pub mods_dir: PathBuf,
    pub state_file: PathBuf,
    pub loader: LoaderConfig,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        let data_dir = data_dir();
        Self {
            mods_dir: data_dir.join("mods"),
            state_file: data_dir.join("mods.json"),
            loader: LoaderConfig::default(),
        }
    }
}

impl BootstrapConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MODS_DIR` - Directory holding one sub-directory per mod (default: `<data dir>/mods`)
    /// - `MOD_STATE_FILE` - Saved enable/order state (default: `<data dir>/mods.json`)
    /// - `MOD_AUTO_RELOAD` - Reload after every enable/move (default: false)
    /// - `MOD_ERROR_BUFFER` - Error channel capacity (default: 64)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("MODS_DIR") {
            config.mods_dir = PathBuf::from(dir);
        }

        if let Ok(file) = env::var("MOD_STATE_FILE") {
            config.state_file = PathBuf::from(file);
        }

        if let Some(enable) = read_env::<bool>("MOD_AUTO_RELOAD") {
            config.loader.auto_reload = enable;
        } else if env::var("MOD_AUTO_RELOAD").is_ok() {
            // A bare variable counts as "true"
            config.loader.auto_reload = true;
        }

        if let Some(capacity) = read_env::<usize>("MOD_ERROR_BUFFER") {
            config.loader.error_buffer = capacity.max(1);
        }

        config
    }

    pub fn with_mods_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mods_dir = dir.into();
        self
    }

    pub fn with_state_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.state_file = file.into();
        self
    }
}

const APP_NAME: &str = "modctl";

/// Platform data directory for mod data.
///
/// - macOS: `~/Library/Application Support/modctl`
/// - Linux: `~/.local/share/modctl` (or `$XDG_DATA_HOME/modctl`)
/// - Windows: `%APPDATA%\modctl`
/// - Fallback: `./mod_data`
pub fn data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./mod_data"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
