//! Configuration — YAML config + env var overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::resonance::Constants;
use crate::store::DEFAULT_STATE_FILENAME;

pub const CONFIG_FILENAME: &str = "config.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Memory snapshot (relative to the project root unless absolute)
    #[serde(default = "default_state_path")]
    pub state_path: String,

    /// Optional persona JSON; the built-in JinxEcho persona otherwise
    #[serde(default)]
    pub persona_path: Option<String>,

    /// Log file (the console owns stdout)
    #[serde(default = "default_log_path")]
    pub log_path: String,

    /// Who the console is talking to when no name is given
    #[serde(default = "default_operator")]
    pub operator: String,

    /// Substituted when a typed score does not parse
    #[serde(default = "default_resonance")]
    pub default_resonance: f64,

    /// The quiet human tax, Hz
    #[serde(default = "default_grief_baseline")]
    pub grief_baseline: f64,

    /// Triad resonance when mirrors align, Hz
    #[serde(default = "default_target_hum")]
    pub target_hum: f64,

    /// Below this a breath cycle nudges resonance upward
    #[serde(default = "default_coupling_constant")]
    pub coupling_constant: f64,

    /// Drift allowance around the target hum
    #[serde(default = "default_dark_matter_hedge")]
    pub dark_matter_hedge: f64,

    /// Pause between breath steps
    #[serde(default = "default_breath_pace_ms")]
    pub breath_pace_ms: u64,

    /// Random +/- spread on each pause
    #[serde(default = "default_breath_jitter_ms")]
    pub breath_jitter_ms: u64,

    /// Dream consolidation needs more conversations than this
    #[serde(default = "default_dream_min_conversations")]
    pub dream_min_conversations: usize,

    /// Resolved project root (set at load time, not serialized from YAML)
    #[serde(skip)]
    pub project_root: PathBuf,
}

fn default_state_path() -> String {
    DEFAULT_STATE_FILENAME.into()
}
fn default_log_path() -> String {
    "jinxecho.log".into()
}
fn default_operator() -> String {
    "Barbara".into()
}
fn default_resonance() -> f64 {
    0.67
}
fn default_grief_baseline() -> f64 {
    0.23
}
fn default_target_hum() -> f64 {
    0.60
}
fn default_coupling_constant() -> f64 {
    0.85
}
fn default_dark_matter_hedge() -> f64 {
    0.3
}
fn default_breath_pace_ms() -> u64 {
    3500
}
fn default_breath_jitter_ms() -> u64 {
    500
}
fn default_dream_min_conversations() -> usize {
    5
}

impl Config {
    /// Load config from a YAML file with env var overrides.
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        let mut config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config.yaml")?;

        let parent = config_path.parent().unwrap_or(Path::new("."));
        config.project_root = parent
            .canonicalize()
            .unwrap_or_else(|_| parent.to_path_buf());

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `project_root/config.yaml`, or defaults (plus env overrides) when
    /// there is none.
    pub fn load_from_dir(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILENAME);
        if config_path.is_file() {
            return Self::load(&config_path);
        }
        let mut config = Self {
            project_root: project_root.to_path_buf(),
            ..Self::default()
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(p) = std::env::var("JINXECHO_STATE_PATH") {
            self.state_path = p;
        }
        if let Ok(p) = std::env::var("JINXECHO_PERSONA_PATH") {
            self.persona_path = Some(p);
        }
        if let Ok(p) = std::env::var("JINXECHO_LOG_PATH") {
            self.log_path = p;
        }
        if let Ok(name) = std::env::var("JINXECHO_OPERATOR") {
            self.operator = name;
        }
        if let Ok(ms) = std::env::var("JINXECHO_BREATH_PACE_MS") {
            self.breath_pace_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("JINXECHO_BREATH_PACE_MS is not a number: {ms}"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.default_resonance) {
            anyhow::bail!(
                "default_resonance must lie in [0.0, 1.0], got {}",
                self.default_resonance
            );
        }
        if self.operator.trim().is_empty() {
            anyhow::bail!("operator must not be empty");
        }
        Ok(())
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.project_root.join(p)
        }
    }

    pub fn state_file(&self) -> PathBuf {
        self.resolve(&self.state_path)
    }

    pub fn persona_file(&self) -> Option<PathBuf> {
        self.persona_path.as_deref().map(|p| self.resolve(p))
    }

    pub fn log_file(&self) -> PathBuf {
        self.resolve(&self.log_path)
    }

    pub fn constants(&self) -> Constants {
        Constants {
            grief_baseline: self.grief_baseline,
            target_hum: self.target_hum,
            coupling_constant: self.coupling_constant,
            dark_matter_hedge: self.dark_matter_hedge,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
            persona_path: None,
            log_path: default_log_path(),
            operator: default_operator(),
            default_resonance: default_resonance(),
            grief_baseline: default_grief_baseline(),
            target_hum: default_target_hum(),
            coupling_constant: default_coupling_constant(),
            dark_matter_hedge: default_dark_matter_hedge(),
            breath_pace_ms: default_breath_pace_ms(),
            breath_jitter_ms: default_breath_jitter_ms(),
            dream_min_conversations: default_dream_min_conversations(),
            project_root: PathBuf::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "operator: Barbara").unwrap();

        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.default_resonance, 0.67);
        assert_eq!(config.target_hum, 0.60);
        assert_eq!(config.coupling_constant, 0.85);
        assert_eq!(config.dream_min_conversations, 5);
        assert_eq!(config.state_path, "jinxecho_memory.json");
    }

    #[test]
    fn test_load_config_custom_values() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            "operator: Grok\nstate_path: /var/lib/jinx/memory.json\nbreath_jitter_ms: 0\ntarget_hum: 0.5"
        )
        .unwrap();

        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config.breath_jitter_ms, 0);
        assert_eq!(config.target_hum, 0.5);
        assert_eq!(
            config.state_file(),
            PathBuf::from("/var/lib/jinx/memory.json")
        );
    }

    #[test]
    fn test_relative_paths_resolve_against_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "persona_path: persona.json\n").unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap();
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.persona_file(), Some(root.join("persona.json")));
        assert!(config.state_file().ends_with("jinxecho_memory.json"));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.project_root, dir.path());
        assert_eq!(config.breath_pace_ms, 3500);
    }

    #[test]
    fn test_out_of_range_default_resonance_fails() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "default_resonance: 1.7").unwrap();
        assert!(Config::load(tmp.path()).is_err());
    }
}
