use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File as ConfigFile, FileFormat};
use eyre::{eyre, Context, Result};
use fs_err::{create_dir_all, File};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

const EXAMPLE_CONFIG: &str = include_str!("../config.toml");

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct Settings {
    pub server_address: String,
    pub session_path: String,
    pub log_path: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn config_file() -> PathBuf {
        let config_dir = std::env::var("ESTATE_CONFIG_DIR")
            .map_or_else(|_| estate_common::utils::config_dir(), PathBuf::from);
        config_dir.join("config.toml")
    }

    /// Defaults only. Tests layer their own values on top of this.
    pub fn build_default() -> Result<ConfigBuilder<DefaultState>> {
        let data_dir = estate_common::utils::data_dir();
        let session_path = data_dir.join("session.json");
        let log_path = data_dir.join("estate.log");

        Ok(Config::builder()
            .set_default("server_address", "http://127.0.0.1:8080")?
            .set_default("session_path", session_path.to_str())?
            .set_default("log_path", log_path.to_str())?
            .set_default("page_size", 20)?
            .set_default("timeout_secs", 30)?)
    }

    fn environment() -> Environment {
        Environment::with_prefix("estate")
            .prefix_separator("_")
            .separator("__")
    }

    /// Defaults, then the config file when there is one, then `ESTATE_*` variables.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>> {
        let config_file = Self::config_file();
        let mut config_builder = Self::build_default()?;
        if config_file.exists() {
            let path = config_file
                .to_str()
                .ok_or_else(|| eyre!("Config path is not valid utf-8"))?;
            config_builder = config_builder.add_source(ConfigFile::new(path, FileFormat::Toml));
        }
        Ok(config_builder.add_source(Self::environment()))
    }

    pub fn new() -> Result<Self> {
        let data_dir = estate_common::utils::data_dir();
        let config_file = Self::config_file();

        create_dir_all(&data_dir).wrap_err_with(|| format!("Failed to create dir {data_dir:?}"))?;
        if let Some(config_dir) = config_file.parent() {
            create_dir_all(config_dir)
                .wrap_err_with(|| format!("Failed to create dir {config_dir:?}"))?;
        }

        if !config_file.exists() {
            let mut file = File::create(&config_file).wrap_err("Failed to create config file")?;
            file.write_all(EXAMPLE_CONFIG.as_bytes())
                .wrap_err("Failed to write default config file")?;
        }

        let mut settings: Settings = Self::builder()?
            .build()?
            .try_deserialize()
            .map_err(|e| eyre!("Failed to deserialize {}", e))?;

        settings.session_path = expand_shell(&settings.session_path)?;
        settings.log_path = expand_shell(&settings.log_path)?;
        settings.server_address = settings.server_address.trim_end_matches('/').to_string();

        Ok(settings)
    }

    pub fn config_path() -> PathBuf {
        Self::config_file()
    }
}

fn expand_shell(value: &str) -> Result<String> {
    Ok(shellexpand::full(value)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_can_be_overridden() {
        let settings: Settings = Settings::build_default()
            .unwrap()
            .set_default("server_address", "http://example.test")
            .unwrap()
            .set_default("page_size", 5)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server_address, "http://example.test");
        assert_eq!(settings.page_size, 5);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert!(settings.session_path.ends_with("session.json"));
    }
}
