use std::{fs, path::Path};

use client_core::BackendConfig;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "creatorverse.toml";
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8787";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuiSettings {
    pub backend_url: String,
    pub api_key: Option<String>,
}

impl Default for GuiSettings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            api_key: None,
        }
    }
}

impl GuiSettings {
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig::new(self.backend_url.clone(), self.api_key.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend_url: Option<String>,
    api_key: Option<String>,
}

/// Defaults, then the config file, then environment, then command-line flags.
pub fn load_settings(
    config_path: &Path,
    cli_backend_url: Option<String>,
    cli_api_key: Option<String>,
) -> GuiSettings {
    let mut settings = GuiSettings::default();

    match fs::read_to_string(config_path) {
        Ok(raw) => apply_file_settings(&mut settings, &raw),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => {
            tracing::warn!(path = %config_path.display(), %error, "could not read gui config")
        }
    }

    if let Some(v) = env_value("SUPABASE_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = env_value("CREATORVERSE_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = env_value("SUPABASE_ANON_KEY") {
        settings.api_key = Some(v);
    }
    if let Some(v) = env_value("CREATORVERSE_API_KEY") {
        settings.api_key = Some(v);
    }

    if let Some(v) = cli_backend_url.as_deref().and_then(non_empty) {
        settings.backend_url = v;
    }
    if let Some(v) = cli_api_key.as_deref().and_then(non_empty) {
        settings.api_key = Some(v);
    }

    settings
}

fn apply_file_settings(settings: &mut GuiSettings, raw: &str) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(error) => {
            tracing::warn!(%error, "ignoring unreadable {DEFAULT_CONFIG_PATH}");
            return;
        }
    };
    if let Some(v) = file_cfg.backend_url.as_deref().and_then(non_empty) {
        settings.backend_url = v;
    }
    if let Some(v) = file_cfg.api_key.as_deref().and_then(non_empty) {
        settings.api_key = Some(v);
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().as_deref().and_then(non_empty)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
