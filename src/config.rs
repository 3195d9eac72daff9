// =============================================================================
// CONFIG — Fichier TOML et valeurs par défaut
// =============================================================================
//
//   database    = "mtg.db"
//   image_url   = "http://gatherer.wizards.com/Handlers/Image.ashx?multiverseid={id}&type=card"
//   deadline_ms = 2000
//   strict      = false
//   log_level   = "info"
//
// Toutes les clés sont optionnelles ; sans fichier, les valeurs par défaut
// s'appliquent. Les options de la ligne de commande priment ensuite.
//
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_IMAGE_URL: &str =
    "http://gatherer.wizards.com/Handlers/Image.ashx?multiverseid={id}&type=card";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Chemin de la base SQLite
    pub database: PathBuf,
    pub image_url: String,
    /// Budget de temps par message
    pub deadline_ms: u64,
    /// Avertissements pour les termes ignorés
    pub strict: bool,
    /// Filtre `tracing` (`info`, `debug`, `cardstats=trace`...)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: PathBuf::from("mtg.db"),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            deadline_ms: 2000,
            strict: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Charge `path` s'il est donné, sinon les valeurs par défaut.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Config::from_toml_str(&fs::read_to_string(path)?),
            None => Ok(Config::default()),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.database, PathBuf::from("mtg.db"));
        assert_eq!(config.deadline_ms, 2000);
        assert!(!config.strict);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str("database = \"cards.db\"\nstrict = true\n").unwrap();
        assert_eq!(config.database, PathBuf::from("cards.db"));
        assert!(config.strict);
        assert_eq!(config.image_url, DEFAULT_IMAGE_URL);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_file() {
        assert!(matches!(
            Config::from_toml_str("deadline_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::from_toml_str("databse = \"typo.db\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let missing = Path::new("/nonexistent/cardstats.toml");
        assert!(matches!(Config::load(Some(missing)), Err(ConfigError::Io(_))));
    }
}
