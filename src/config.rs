use crate::markdown::DEFAULT_WORDS_PER_MINUTE;
use crate::post::Locale;
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::num::NonZero;
use std::path::Path;

/// The name of the optional configuration file in the content root.
pub const CONFIG_FILE: &str = "_config.toml";

/// Per-site settings, read from `_config.toml` in the content root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Reading speed used for reading-time estimates.
    pub words_per_minute: u32,
    /// The locale to fall back to when a post has no translation.
    pub default_locale: Locale,
    /// Worker threads for loading many posts at once. Defaults to the
    /// available parallelism.
    pub threads: Option<NonZero<usize>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            default_locale: Locale::En,
            threads: None,
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        match fs::read_to_string(root.join(CONFIG_FILE)) {
            // Silently proceed if the file isn't found, but crash on other errors.
            Err(ref e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e)?,
            Ok(s) => Ok(toml::from_str(&s)?),
        }
    }

    /// How many threads to use for a batch of work.
    pub fn thread_count(&self) -> usize {
        self.threads
            .or_else(|| std::thread::available_parallelism().ok())
            .map_or(1, NonZero::get)
    }
}
