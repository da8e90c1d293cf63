use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Roster read when no input is configured.
pub const DEFAULT_INPUT: &str = "currentroster.json";
/// Copy written when no output is configured.
pub const DEFAULT_OUTPUT: &str = "currentroster_02.json";
/// Seconds a single HEAD probe may take before the image counts as unreachable.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Global configuration loaded from `~/.config/roster-audit/config.toml`.
///
/// Every key is optional in the file; missing keys take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Roster JSON to read. Relative paths resolve against the working directory.
    pub input_path: PathBuf,
    /// Where the unmodified roster copy is written.
    pub output_path: PathBuf,
    /// Timeout for each image HEAD probe.
    pub probe_timeout_secs: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
        }
    }
}

impl AuditConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Reject values that would leave a probe unbounded.
    pub fn validate(&self) -> Result<()> {
        if self.probe_timeout_secs == 0 {
            anyhow::bail!("probe_timeout_secs must be at least 1");
        }
        Ok(())
    }
}

/// Output path paired with a custom input: `<stem>_02.json` next to it.
///
/// `rosters/legends.json` → `rosters/legends_02.json`.
pub fn sibling_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "roster".to_string());
    input.with_file_name(format!("{stem}_02.json"))
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("roster-audit")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from `path`, writing a default file there if none exists.
pub fn load_or_init_at(path: &Path) -> Result<AuditConfig> {
    if !path.exists() {
        let default_cfg = AuditConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AuditConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AuditConfig> {
    load_or_init_at(&config_path()?)
}
