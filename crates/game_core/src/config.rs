use std::{collections::HashMap, fs};

use serde::Deserialize;

/// Static configuration for the session core: where the judge service
/// lives and which theme rounds are requested under.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub judge_base_url: String,
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            judge_base_url: "http://127.0.0.1:5000".into(),
            theme: "nature".into(),
        }
    }
}

/// Defaults, overridden by an optional `judge.toml` in the working
/// directory, overridden in turn by environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("judge.toml") {
        apply_file_settings(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("JUDGE_BASE_URL") {
        settings.judge_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__JUDGE_BASE_URL") {
        settings.judge_base_url = v;
    }

    if let Ok(v) = std::env::var("JUDGE_THEME") {
        settings.theme = v;
    }
    if let Ok(v) = std::env::var("APP__THEME") {
        settings.theme = v;
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("judge_base_url") {
            settings.judge_base_url = v.clone();
        }
        if let Some(v) = file_cfg.get("theme") {
            settings.theme = v.clone();
        }
    }
}
