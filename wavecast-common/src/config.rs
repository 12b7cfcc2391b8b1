//! Configuration loading and data folder resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Data folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file (`data_dir` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&str>, env_var_name: &str) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return Ok(PathBuf::from(path));
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(data_dir) = config.get("data_dir").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(data_dir));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_data_dir())
}

/// Locate the wavecast config file for the platform
fn find_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/wavecast/config.toml first, then /etc/wavecast/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("wavecast").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/wavecast/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        let path = dirs::config_dir()
            .map(|d| d.join("wavecast").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!("Config file not found: {:?}", path)))
        }
    }
}

/// OS-dependent default data folder
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("wavecast"))
        .unwrap_or_else(|| PathBuf::from("./wavecast_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arg_wins() {
        let dir = resolve_data_dir(Some("/tmp/radio"), "WAVECAST_TEST_UNSET_VAR").unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/radio"));
    }

    #[test]
    fn test_env_var_used_when_no_cli_arg() {
        std::env::set_var("WAVECAST_TEST_DATA_DIR", "/tmp/radio-env");
        let dir = resolve_data_dir(None, "WAVECAST_TEST_DATA_DIR").unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/radio-env"));
        std::env::remove_var("WAVECAST_TEST_DATA_DIR");
    }

    #[test]
    fn test_fallback_is_nonempty() {
        let dir = resolve_data_dir(None, "WAVECAST_TEST_UNSET_VAR_2").unwrap();
        assert!(!dir.as_os_str().is_empty());
    }
}
