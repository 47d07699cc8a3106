use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Lockfile location used when neither config nor CLI names one.
pub const DEFAULT_LOCKFILE: &str = "third_party/python/requirements.txt";

/// Worker count used when the host cannot report its parallelism.
pub const FALLBACK_WORKERS: usize = 8;

/// External fetch command: program plus the leading arguments that select
/// its "download" mode. Per-job arguments are appended after these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchCommandConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for FetchCommandConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["-m".to_string(), "pip".to_string(), "download".to_string()],
        }
    }
}

/// Global configuration loaded from `~/.config/lockfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockfetchConfig {
    /// Lockfile to read requirements from (relative paths resolve against the cwd).
    pub lockfile: PathBuf,
    /// Upper bound on concurrently running fetch jobs (None = host parallelism).
    pub workers: Option<usize>,
    /// Per-job timeout in seconds (None or 0 = wait for the fetch command indefinitely).
    pub timeout_secs: Option<u64>,
    /// Number of trailing diagnostic characters shown per failure in the summary.
    pub diagnostic_tail_chars: usize,
    pub fetch_command: FetchCommandConfig,
}

impl Default for LockfetchConfig {
    fn default() -> Self {
        Self {
            lockfile: PathBuf::from(DEFAULT_LOCKFILE),
            workers: None,
            timeout_secs: None,
            diagnostic_tail_chars: 200,
            fetch_command: FetchCommandConfig::default(),
        }
    }
}

impl LockfetchConfig {
    /// Worker bound to use: configured value, else host parallelism. Never 0.
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(default_workers).max(1)
    }

    /// Per-job deadline. A configured 0 means no deadline.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }
}

/// Available parallelism of the host, or [`FALLBACK_WORKERS`] if unknown.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_WORKERS)
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("lockfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LockfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = LockfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit path. Missing fields take their defaults.
pub fn load_from_path(path: &Path) -> Result<LockfetchConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: LockfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = LockfetchConfig::default();
        assert_eq!(cfg.lockfile, PathBuf::from(DEFAULT_LOCKFILE));
        assert!(cfg.workers.is_none());
        assert!(cfg.timeout_secs.is_none());
        assert_eq!(cfg.diagnostic_tail_chars, 200);
        assert_eq!(cfg.fetch_command.program, "python3");
        assert_eq!(cfg.fetch_command.args, vec!["-m", "pip", "download"]);
    }

    #[test]
    fn config_toml_roundtrip() {
        let mut cfg = LockfetchConfig::default();
        cfg.workers = Some(3);
        cfg.timeout_secs = Some(90);
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: LockfetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.lockfile, cfg.lockfile);
        assert_eq!(parsed.workers, Some(3));
        assert_eq!(parsed.timeout_secs, Some(90));
        assert_eq!(parsed.fetch_command, cfg.fetch_command);
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let toml = r#"
            workers = 4
        "#;
        let cfg: LockfetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.workers, Some(4));
        assert_eq!(cfg.lockfile, PathBuf::from(DEFAULT_LOCKFILE));
        assert_eq!(cfg.diagnostic_tail_chars, 200);
        assert_eq!(cfg.fetch_command, FetchCommandConfig::default());
    }

    #[test]
    fn config_toml_custom_fetch_command() {
        let toml = r#"
            lockfile = "locks/requirements.txt"
            timeout_secs = 600
            diagnostic_tail_chars = 80

            [fetch_command]
            program = "uv"
            args = ["pip", "download"]
        "#;
        let cfg: LockfetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.lockfile, PathBuf::from("locks/requirements.txt"));
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(600)));
        assert_eq!(cfg.diagnostic_tail_chars, 80);
        assert_eq!(cfg.fetch_command.program, "uv");
        assert_eq!(cfg.fetch_command.args, vec!["pip", "download"]);
    }

    #[test]
    fn effective_workers_never_zero() {
        let mut cfg = LockfetchConfig::default();
        assert!(cfg.effective_workers() >= 1);
        cfg.workers = Some(0);
        assert_eq!(cfg.effective_workers(), 1);
        cfg.workers = Some(12);
        assert_eq!(cfg.effective_workers(), 12);
    }

    #[test]
    fn zero_timeout_means_no_deadline() {
        let mut cfg = LockfetchConfig::default();
        assert_eq!(cfg.timeout(), None);
        cfg.timeout_secs = Some(0);
        assert_eq!(cfg.timeout(), None);
        cfg.timeout_secs = Some(30);
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "workers = 2\n").unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.workers, Some(2));
    }
}
