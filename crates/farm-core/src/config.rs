use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::session::Credentials;

pub const CONFIG_FILE: &str = "farm.toml";

/// Config file lookup.
///
/// Search order:
/// 1) `RUSTY_FARM_CONFIG_DIR/<relative_path>`
/// 2) `./<relative_path>`
/// 3) `<repo_root>/config/<relative_path>` (repo-local convenience)
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn parse_from_file<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::parse_from_string(&text)
            .with_context(|| format!("Invalid config at {}", path.display()))
    }

    pub fn parse_from_string<T: DeserializeOwned>(text: &str) -> anyhow::Result<T> {
        toml::from_str(text).with_context(|| "Failed to parse TOML")
    }

    pub fn find(relative_path: &str) -> Option<PathBuf> {
        let rel = Path::new(relative_path);

        if let Some(root) = env::var_os("RUSTY_FARM_CONFIG_DIR") {
            let candidate = PathBuf::from(root).join(rel);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if let Ok(cwd) = env::current_dir() {
            let candidate = cwd.join(rel);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        // This crate lives at <repo_root>/crates/farm-core.
        let candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .ancestors()
            .nth(2)?
            .join("config")
            .join(rel);
        candidate.is_file().then_some(candidate)
    }
}

/// Fixed delays between calls. These pace the bot for the service's rate expectations.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Pacing {
    /// Pause after searching a pokestop, before the nearby catch pass.
    pub fort_cooldown_ms: u64,
    pub after_catch_ms: u64,
    pub release_delay_ms: u64,
    pub evolve_delay_ms: u64,
    /// Pause between farm iterations, successful or not.
    pub loop_delay_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            fort_cooldown_ms: 15_000,
            after_catch_ms: 5_000,
            release_delay_ms: 500,
            evolve_delay_ms: 3_000,
            loop_delay_ms: 10_000,
        }
    }
}

impl Pacing {
    /// No pauses at all. Used by tests and dry runs.
    pub fn immediate() -> Self {
        Self {
            fort_cooldown_ms: 0,
            after_catch_ms: 0,
            release_delay_ms: 0,
            evolve_delay_ms: 0,
            loop_delay_ms: 0,
        }
    }

    pub fn fort_cooldown(&self) -> Duration {
        Duration::from_millis(self.fort_cooldown_ms)
    }

    pub fn after_catch(&self) -> Duration {
        Duration::from_millis(self.after_catch_ms)
    }

    pub fn release_delay(&self) -> Duration {
        Duration::from_millis(self.release_delay_ms)
    }

    pub fn evolve_delay(&self) -> Duration {
        Duration::from_millis(self.evolve_delay_ms)
    }

    pub fn loop_delay(&self) -> Duration {
        Duration::from_millis(self.loop_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FarmConfig {
    /// May be left out of the file and supplied through the environment instead.
    pub auth: Option<Credentials>,
    /// Address of the session gateway's JSON control port.
    pub gateway_addr: String,
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub keep_per_species: usize,
    /// Upper bound on throws per encounter. Unset means keep throwing while the ball misses.
    pub max_catch_attempts: Option<u32>,
    pub color: bool,
    pub pacing: Pacing,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            auth: None,
            gateway_addr: "127.0.0.1:7979".to_string(),
            default_latitude: 52.379189,
            default_longitude: 4.899431,
            keep_per_species: 1,
            max_catch_attempts: None,
            color: true,
            pacing: Pacing::default(),
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl FarmConfig {
    /// Loads `farm.toml` if one can be found, then applies environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match ConfigLoader::find(CONFIG_FILE) {
            Some(path) => {
                let cfg = ConfigLoader::parse_from_file(&path)?;
                tracing::info!(path = %path.display(), "farm.config.loaded");
                cfg
            }
            None => {
                tracing::info!("farm.config.defaults no {CONFIG_FILE} found");
                FarmConfig::default()
            }
        };
        cfg.apply_overrides(|key| env::var(key).ok())?;
        Ok(cfg)
    }

    /// Applies `RUSTY_FARM_*` overrides read through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(addr) = non_empty(lookup("RUSTY_FARM_GATEWAY_ADDR")) {
            self.gateway_addr = addr;
        }

        let Some(method) = non_empty(lookup("RUSTY_FARM_AUTH")) else {
            return Ok(());
        };
        self.auth = Some(match method.trim().to_ascii_lowercase().as_str() {
            "ptc" => Credentials::Ptc {
                username: non_empty(lookup("RUSTY_FARM_PTC_USERNAME"))
                    .context("RUSTY_FARM_AUTH=ptc requires RUSTY_FARM_PTC_USERNAME")?,
                password: non_empty(lookup("RUSTY_FARM_PTC_PASSWORD"))
                    .context("RUSTY_FARM_AUTH=ptc requires RUSTY_FARM_PTC_PASSWORD")?,
            },
            "google" => Credentials::Google {
                token: non_empty(lookup("RUSTY_FARM_GOOGLE_TOKEN"))
                    .context("RUSTY_FARM_AUTH=google requires RUSTY_FARM_GOOGLE_TOKEN")?,
            },
            other => anyhow::bail!("unknown RUSTY_FARM_AUTH {other:?} (expected ptc or google)"),
        });
        Ok(())
    }

    pub fn credentials(&self) -> anyhow::Result<&Credentials> {
        self.auth
            .as_ref()
            .context("no credentials configured (set [auth] in farm.toml or RUSTY_FARM_AUTH)")
    }
}
