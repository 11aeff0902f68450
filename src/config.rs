use std::collections::BTreeMap;
use std::path::PathBuf;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::expand::DEFAULT_ESCAPE;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Environment variable naming an alternative user config file.
pub const CONFIG_ENV_VAR: &str = "SHELLGLUE_CONFIG";

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Local variables declared into every session built from this config.
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
    /// Environment variables declared into every session built from this config.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_escape_char")]
    pub escape_char: char,
    #[serde(default)]
    pub panic_on_err: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            escape_char: DEFAULT_ESCAPE,
            panic_on_err: false,
        }
    }
}

fn default_escape_char() -> char {
    DEFAULT_ESCAPE
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Log file path, `~` expanded. Empty disables file logging.
    #[serde(default)]
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: String::new(),
        }
    }
}

fn default_level() -> String {
    "warn".into()
}

impl LoggingConfig {
    /// Parsed `level`; unknown names fall back to `warn`.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or_else(|_| {
            eprintln!("shellglue: unknown log level {:?}, using warn", self.level);
            LevelFilter::Warn
        })
    }

    /// The log file path with `~` expanded, if file logging is enabled.
    pub fn file_path(&self) -> Option<PathBuf> {
        let file = self.file.trim();
        if file.is_empty() {
            return None;
        }
        Some(PathBuf::from(shellexpand::tilde(file).into_owned()))
    }
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    remove_vars: Vec<String>,
    #[serde(default)]
    remove_env: Vec<String>,
    #[serde(default)]
    session: SessionOverlay,
    #[serde(default)]
    logging: LoggingOverlay,
    #[serde(default)]
    vars: BTreeMap<String, String>,
    #[serde(default)]
    env: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Default)]
struct SessionOverlay {
    escape_char: Option<char>,
    panic_on_err: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct LoggingOverlay {
    level: Option<String>,
    file: Option<String>,
}

// ── Merge logic ──

/// Merge user entries into a default map: remove first, then insert
/// (user values override defaults of the same name).
fn merge_map(
    base: &mut BTreeMap<String, String>,
    add: BTreeMap<String, String>,
    remove: &[String],
) {
    base.retain(|name, _| !remove.contains(name));
    base.extend(add);
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge the user overlay from `$SHELLGLUE_CONFIG` or
    ///    `~/.config/shellglue/config.toml` (if it exists)
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Path of the user overlay file.
    pub fn user_config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var(CONFIG_ENV_VAR).ok().filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(shellexpand::tilde(&path).into_owned()));
        }
        let home = std::env::var_os("HOME")?;
        Some(std::path::Path::new(&home).join(".config/shellglue/config.toml"))
    }

    fn load_overlay() -> Option<ConfigOverlay> {
        let path = Self::user_config_path()?;
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("shellglue: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        // Session: scalar overrides
        if let Some(c) = overlay.session.escape_char {
            if c == '$' {
                eprintln!("shellglue: '$' cannot be the escape character, ignoring");
            } else {
                self.session.escape_char = c;
            }
        }
        if let Some(v) = overlay.session.panic_on_err {
            self.session.panic_on_err = v;
        }

        // Logging
        if let Some(level) = overlay.logging.level {
            self.logging.level = level;
        }
        if let Some(file) = overlay.logging.file {
            self.logging.file = file;
        }

        merge_map(&mut self.vars, overlay.vars, &overlay.remove_vars);
        merge_map(&mut self.env, overlay.env, &overlay.remove_env);
    }

    /// Render the merged configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
