//! Configuration
//!
//! Four settings drive a session: the display name used in the prompt,
//! the archive to load, where to write the audit log, and the startup
//! script. They live in a `[Settings]` section of an INI file, or in a
//! `[settings]` table when the file has a `.toml` extension.
//!
//! The INI reader follows the common `configparser` dialect: keys in
//! `[DEFAULT]` are inherited by every section, values are taken verbatim
//! (quotes included), and `%%` / `%(key)s` are interpolated. Section names
//! match case-insensitively and continuation lines are not supported.

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

const SECTION: &str = "settings";
const DEFAULT_SECTION: &str = "default";
const MAX_INTERPOLATION_DEPTH: usize = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config is missing required key '{key}' in [Settings]")]
    MissingKey { key: &'static str },

    #[error("bad interpolation in '{key}': {message}")]
    Interpolation { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub computer_name: String,
    pub vfs_path: String,
    pub log_file: String,
    pub startup_script: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    computer_name: Option<String>,
    vfs_path: Option<String>,
    log_file: Option<String>,
    startup_script: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawToml {
    #[serde(default, alias = "Settings")]
    settings: RawSettings,
}

impl RawSettings {
    fn into_config(self) -> Result<Config, ConfigError> {
        fn require(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
            value.ok_or(ConfigError::MissingKey { key })
        }
        Ok(Config {
            computer_name: require(self.computer_name, "computer_name")?,
            vfs_path: require(self.vfs_path, "vfs_path")?,
            log_file: require(self.log_file, "log_file")?,
            startup_script: require(self.startup_script, "startup_script")?,
        })
    }
}

impl Config {
    /// Load from disk, choosing the format by file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&text)
        } else {
            Self::from_ini_str(&text)
        }
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: RawToml = toml::from_str(input)?;
        raw.settings.into_config()
    }

    pub fn from_ini_str(input: &str) -> Result<Self, ConfigError> {
        let sections = parse_ini(input);
        let Some(section) = sections.get(SECTION) else {
            return RawSettings::default().into_config();
        };
        let mut vars = sections.get(DEFAULT_SECTION).cloned().unwrap_or_default();
        vars.extend(section.iter().map(|(k, v)| (k.clone(), v.clone())));

        let get = |key: &str| -> Result<Option<String>, ConfigError> {
            vars.get(key)
                .map(|raw| interpolate(key, raw, &vars, 1))
                .transpose()
        };
        RawSettings {
            computer_name: get("computer_name")?,
            vfs_path: get("vfs_path")?,
            log_file: get("log_file")?,
            startup_script: get("startup_script")?,
        }
        .into_config()
    }
}

/// Sections (lowercased) mapped to their key/value pairs (keys lowercased).
/// Keys outside any section are dropped.
fn parse_ini(input: &str) -> IndexMap<String, IndexMap<String, String>> {
    let mut root: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
    let mut current_section: Option<String> = None;

    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
            continue;
        }
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            let section = trimmed[1..trimmed.len() - 1].trim().to_lowercase();
            root.entry(section.clone()).or_default();
            current_section = Some(section);
        } else if let Some(pos) = trimmed.find(['=', ':']) {
            let key = trimmed[..pos].trim().to_lowercase();
            let val = trimmed[pos + 1..].trim().to_string();
            if let Some(section) = current_section.as_ref().and_then(|s| root.get_mut(s)) {
                section.insert(key, val);
            }
        }
    }
    root
}

/// Expand `%%` and `%(name)s` references against `vars`.
fn interpolate(
    key: &str,
    value: &str,
    vars: &IndexMap<String, String>,
    depth: usize,
) -> Result<String, ConfigError> {
    let fail = |message: String| ConfigError::Interpolation {
        key: key.to_string(),
        message,
    };
    if depth > MAX_INTERPOLATION_DEPTH {
        return Err(fail("recursion limit exceeded".to_string()));
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if let Some(after) = tail.strip_prefix('%') {
            out.push('%');
            rest = after;
        } else if let Some(body) = tail.strip_prefix('(') {
            let reference = body
                .find(')')
                .filter(|&close| close > 0 && body[close + 1..].starts_with('s'));
            let Some(close) = reference else {
                return Err(fail(format!("bad variable reference in {:?}", value)));
            };
            let name = body[..close].to_lowercase();
            let raw = vars
                .get(&name)
                .ok_or_else(|| fail(format!("no option '{}' to substitute", name)))?;
            out.push_str(&interpolate(key, raw, vars, depth + 1)?);
            rest = &body[close + 2..];
        } else {
            return Err(fail("'%' must be followed by '%' or '('".to_string()));
        }
    }
    out.push_str(rest);
    Ok(out)
}
