//! Service configuration from `VERITEXT_*` environment variables.
//!
//! Every knob has a default; the model and artifact paths default to
//! unset, which disables the corresponding cascade layer rather than
//! failing startup.

mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cascade::Thresholds;

pub const DEFAULT_PORT: u16 = 8090;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
pub const DEFAULT_CACHE_DIR: &str = "cache";
pub const DEFAULT_CACHE_TTL_SECS: i64 = 3600;
pub const DEFAULT_CACHE_RETENTION_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the gateway binds to.
    pub bind_addr: String,
    pub port: u16,
    /// Directory for the file tier of the result cache.
    pub cache_dir: PathBuf,
    /// Result TTL; entries older than this are misses.
    pub cache_ttl_secs: i64,
    /// Sweep retention: cache files older than this many days are deleted.
    pub cache_retention_days: i64,
    /// Semantic index artifact. Unset disables Layer 2.
    pub index_path: Option<PathBuf>,
    /// Corpus metadata JSON. Unset disables Layers 1 and 2.
    pub corpus_path: Option<PathBuf>,
    /// Sentence encoder model directory. Unset disables Layer 2.
    pub encoder_path: Option<PathBuf>,
    /// Pairwise classifier model directory. Unset disables Layer 3.
    pub classifier_path: Option<PathBuf>,
    /// Replace the encoder with the deterministic stub (testing only).
    pub encoder_stub: bool,
    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            cache_retention_days: DEFAULT_CACHE_RETENTION_DAYS,
            index_path: None,
            corpus_path: None,
            encoder_path: None,
            classifier_path: None,
            encoder_stub: false,
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Thresholds::default();
        let thresholds = Thresholds {
            direct: env_parse("VERITEXT_THRESHOLD_DIRECT", defaults.direct)?,
            paraphrase: env_parse("VERITEXT_THRESHOLD_PARAPHRASE", defaults.paraphrase)?,
            lexical_direct: env_parse(
                "VERITEXT_THRESHOLD_LEXICAL_DIRECT",
                defaults.lexical_direct,
            )?,
            lexical_match: env_parse("VERITEXT_THRESHOLD_LEXICAL_MATCH", defaults.lexical_match)?,
            ambiguous_low: env_parse("VERITEXT_THRESHOLD_AMBIGUOUS_LOW", defaults.ambiguous_low)?,
            classifier: env_parse("VERITEXT_THRESHOLD_CLASSIFIER", defaults.classifier)?,
            fast_lexical: env_parse("VERITEXT_THRESHOLD_FAST_LEXICAL", defaults.fast_lexical)?,
        };

        let config = Self {
            bind_addr: env_string("VERITEXT_BIND_ADDR", DEFAULT_BIND_ADDR),
            port: env_parse("VERITEXT_PORT", DEFAULT_PORT)?,
            cache_dir: env_path("VERITEXT_CACHE_DIR").unwrap_or_else(|| DEFAULT_CACHE_DIR.into()),
            cache_ttl_secs: env_parse("VERITEXT_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            cache_retention_days: env_parse(
                "VERITEXT_CACHE_RETENTION_DAYS",
                DEFAULT_CACHE_RETENTION_DAYS,
            )?,
            index_path: env_path("VERITEXT_INDEX_PATH"),
            corpus_path: env_path("VERITEXT_CORPUS_PATH"),
            encoder_path: env_path("VERITEXT_ENCODER_PATH"),
            classifier_path: env_path("VERITEXT_CLASSIFIER_PATH"),
            encoder_stub: env_flag("VERITEXT_ENCODER_STUB"),
            thresholds,
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        for (name, value) in [
            ("direct", t.direct),
            ("paraphrase", t.paraphrase),
            ("lexical_direct", t.lexical_direct),
            ("lexical_match", t.lexical_match),
            ("ambiguous_low", t.ambiguous_low),
            ("classifier", t.classifier),
            ("fast_lexical", t.fast_lexical),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "threshold {name} must be in [0, 1], got {value}"
                )));
            }
        }
        if t.ambiguous_low > t.paraphrase {
            return Err(ConfigError::Invalid(format!(
                "ambiguous_low ({}) must not exceed paraphrase ({})",
                t.ambiguous_low, t.paraphrase
            )));
        }
        if self.cache_ttl_secs < 0 {
            return Err(ConfigError::Invalid(format!(
                "cache TTL must be non-negative, got {}",
                self.cache_ttl_secs
            )));
        }
        if self.cache_retention_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "cache retention must be non-negative, got {}",
                self.cache_retention_days
            )));
        }
        Ok(())
    }
}

fn env_string(key: &'static str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_path(key: &'static str) -> Option<PathBuf> {
    env::var(key).ok().filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn env_flag(key: &'static str) -> bool {
    matches!(
        env::var(key).ok().as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) if !value.is_empty() => {
            value
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    key,
                    value,
                    reason: e.to_string(),
                })
        }
        _ => Ok(default),
    }
}
