use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::routing::DEFAULT_REDIRECT_COOLDOWN;

/// Default advisory budget for a no-reload language switch.
pub const DEFAULT_SWITCH_BUDGET: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct Config {
    // Redirect guard
    pub redirect_cooldown: Duration,
    pub auto_redirect: bool,

    // Switch orchestrator
    pub switch_budget: Duration,

    // Headless persistence
    pub preference_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let auto_redirect = match std::env::var("DEEPHAND_AUTO_REDIRECT") {
            Ok(raw) => parse_flag(&raw)
                .with_context(|| format!("DEEPHAND_AUTO_REDIRECT has invalid value '{}'", raw))?,
            Err(_) => true,
        };

        Ok(Self {
            redirect_cooldown: std::env::var("DEEPHAND_REDIRECT_COOLDOWN_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_REDIRECT_COOLDOWN),
            auto_redirect,

            switch_budget: std::env::var("DEEPHAND_SWITCH_BUDGET_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_SWITCH_BUDGET),

            preference_file: std::env::var("DEEPHAND_PREFERENCE_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redirect_cooldown: DEFAULT_REDIRECT_COOLDOWN,
            auto_redirect: true,
            switch_budget: DEFAULT_SWITCH_BUDGET,
            preference_file: None,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
