use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Seed text for a brand-new question
pub const DEFAULT_SENTENCE: &str = "Underline the words here to convert them into blanks";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding question files
    #[serde(default = "default_questions_path")]
    pub questions_path: PathBuf,
    /// Text a new question starts with
    #[serde(default = "default_sentence")]
    pub default_sentence: String,
}

fn default_questions_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_sentence() -> String {
    DEFAULT_SENTENCE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions_path: default_questions_path(),
            default_sentence: default_sentence(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded questions path
        config.questions_path =
            Self::expand_path(&config.questions_path).unwrap_or(config.questions_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/cloze-author");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Path of a named question file inside `questions_path`
    pub fn question_file(&self, name: &str) -> PathBuf {
        self.questions_path.join(format!("{name}.json"))
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            questions_path: PathBuf::from("/tmp/questions"),
            default_sentence: "Fill me in".to_string(),
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.default_sentence, DEFAULT_SENTENCE);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_config_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "questions_path = [").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(
            result,
            Err(ConfigError::ConfigParseError { config_path, .. }) if config_path == config_file
        ));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let test_config = Config {
            questions_path: PathBuf::from("/tmp/questions"),
            default_sentence: DEFAULT_SENTENCE.to_string(),
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_question_file_lives_in_questions_path() {
        let config = Config {
            questions_path: PathBuf::from("/srv/quiz"),
            ..Config::default()
        };

        assert_eq!(
            config.question_file("capitals"),
            PathBuf::from("/srv/quiz/capitals.json")
        );
    }

    #[test]
    fn test_config_with_env_var_in_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        unsafe {
            env::set_var("CLOZE_QUESTIONS_ROOT", "/custom/questions");
        }
        std::fs::write(&config_file, "questions_path = \"$CLOZE_QUESTIONS_ROOT/geo\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.questions_path, PathBuf::from("/custom/questions/geo"));
        unsafe {
            env::remove_var("CLOZE_QUESTIONS_ROOT");
        }
    }
}
