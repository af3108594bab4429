/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::combination::{CoefficientRange, DEFAULT_COEFFICIENT};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub controls: ControlsConfig,
    pub display: DisplayConfig,
    pub general: GeneralConfig,
    /// Problems found while loading. Reported once logging is up.
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ControlsConfig {
    pub range: CoefficientRange,
    pub coarse_steps: i32,     // steps per Shift / PageUp / PageDown press
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub tick_rate_ms: u64,
    pub banner_ticks: u32,     // how long "SUCCESS!" stays up
    pub extent: f64,           // canvas shows [-extent, extent] on both axes
}

#[derive(Clone, Debug)]
pub struct GeneralConfig {
    pub seed: Option<u64>,     // None = fresh entropy each run
    pub log_file: Option<PathBuf>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    controls: TomlControls,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlControls {
    #[serde(default = "default_min")]
    min: f64,
    #[serde(default = "default_max")]
    max: f64,
    #[serde(default = "default_step")]
    step: f64,
    #[serde(default = "default_coarse_steps")]
    coarse_steps: i32,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_banner_ticks")]
    banner_ticks: u32,
    #[serde(default = "default_extent")]
    extent: f64,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    log_file: Option<String>,
}

// ── Defaults ──

fn default_min() -> f64 { CoefficientRange::DEFAULT.min }
fn default_max() -> f64 { CoefficientRange::DEFAULT.max }
fn default_step() -> f64 { CoefficientRange::DEFAULT.step }
fn default_coarse_steps() -> i32 { 10 }
fn default_tick_rate() -> u64 { 50 }
fn default_banner_ticks() -> u32 { 40 }    // 2s at 50ms tick
fn default_extent() -> f64 { 6.0 }

impl Default for TomlControls {
    fn default() -> Self {
        TomlControls {
            min: default_min(),
            max: default_max(),
            step: default_step(),
            coarse_steps: default_coarse_steps(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            tick_rate_ms: default_tick_rate(),
            banner_ticks: default_banner_ticks(),
            extent: default_extent(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let (text, read_warnings) = read_toml(&candidate_dirs());
        let mut cfg = match text {
            Some(text) => GameConfig::parse(&text),
            None => GameConfig::default(),
        };
        let mut warnings = read_warnings;
        warnings.append(&mut cfg.warnings);
        cfg.warnings = warnings;
        cfg
    }

    /// Parse config text. Unparseable text yields defaults plus a warning.
    pub fn parse(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => GameConfig::from_toml(cfg),
            Err(e) => {
                let mut cfg = GameConfig::default();
                cfg.warnings.push(format!("config.toml parse error: {e}; using default settings"));
                cfg
            }
        }
    }

    fn from_toml(t: TomlConfig) -> Self {
        let mut warnings = Vec::new();
        let controls = &t.controls;
        // the slider must be able to sit at the starting value
        let range = if controls.min < controls.max
            && (controls.min..=controls.max).contains(&DEFAULT_COEFFICIENT)
            && controls.step > 0.0
            && controls.min.is_finite()
            && controls.max.is_finite()
        {
            CoefficientRange { min: controls.min, max: controls.max, step: controls.step }
        } else {
            warnings.push(format!(
                "invalid [controls] range min={} max={} step={}; using defaults",
                controls.min, controls.max, controls.step
            ));
            CoefficientRange::DEFAULT
        };

        let extent = if t.display.extent > 0.0 && t.display.extent.is_finite() {
            t.display.extent
        } else {
            warnings.push(format!("invalid [display] extent={}; using default", t.display.extent));
            default_extent()
        };

        GameConfig {
            controls: ControlsConfig {
                range,
                coarse_steps: t.controls.coarse_steps.max(1),
            },
            display: DisplayConfig {
                tick_rate_ms: t.display.tick_rate_ms.max(1),
                banner_ticks: t.display.banner_ticks,
                extent,
            },
            general: GeneralConfig {
                seed: t.general.seed,
                log_file: t.general.log_file.map(PathBuf::from),
            },
            warnings,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Find and read the first config.toml in the candidate directories.
fn read_toml(search_dirs: &[PathBuf]) -> (Option<String>, Vec<String>) {
    let mut warnings = Vec::new();
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return (Some(text), warnings),
                Err(e) => {
                    warnings.push(format!("could not read {}: {e}", path.display()));
                }
            }
        }
    }
    (None, warnings)
}
