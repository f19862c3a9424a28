//! Configuration management for the resume ranker

use crate::error::{Result, ResumeRankerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    /// Short name from `available_models`, a HuggingFace repo id, or a local directory
    pub embedding_model: String,
    pub available_models: Vec<AvailableModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableModel {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: usize,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub max_workers: usize,
    /// Per-candidate deadline in seconds, 0 disables it
    pub candidate_timeout_secs: u64,
    /// L2-normalize every embedding before the dot product
    pub normalize_embeddings: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-ranker")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                embedding_model: "potion-base-8M".to_string(),
                available_models: vec![
                    AvailableModel {
                        name: "potion-base-8M".to_string(),
                        repo_id: "minishlab/potion-base-8M".to_string(),
                        size_mb: 33,
                        dimensions: 256,
                        description: "High-quality Model2Vec embeddings with 8M parameters".to_string(),
                    },
                    AvailableModel {
                        name: "m2v-base".to_string(),
                        repo_id: "minishlab/M2V_base_output".to_string(),
                        size_mb: 90,
                        dimensions: 256,
                        description: "Fast Model2Vec base embeddings model".to_string(),
                    },
                    AvailableModel {
                        name: "m2v-large".to_string(),
                        repo_id: "minishlab/M2V_large_output".to_string(),
                        size_mb: 250,
                        dimensions: 512,
                        description: "High-capacity Model2Vec large embeddings model".to_string(),
                    },
                ],
            },
            processing: ProcessingConfig {
                max_workers: 4,
                candidate_timeout_secs: 120,
                normalize_embeddings: true,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from `path`, writing defaults there on first run
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeRankerError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeRankerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.processing.max_workers == 0 {
            return Err(ResumeRankerError::Configuration(
                "processing.max_workers must be at least 1".to_string(),
            ));
        }
        if self.models.embedding_model.trim().is_empty() {
            return Err(ResumeRankerError::Configuration(
                "models.embedding_model must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn candidate_timeout(&self) -> Option<Duration> {
        match self.processing.candidate_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn get_model_by_name(&self, name: &str) -> Option<&AvailableModel> {
        self.models
            .available_models
            .iter()
            .find(|m| m.name == name || m.repo_id == name)
    }

    /// Resolve the configured model to something `StaticModel::from_pretrained` accepts:
    /// a downloaded directory if one exists, otherwise the HuggingFace repo id.
    pub fn resolve_embedding_model(&self) -> String {
        let requested = &self.models.embedding_model;

        if Path::new(requested).is_dir() {
            return requested.clone();
        }

        match self.get_model_by_name(requested) {
            Some(model) => {
                let local = self.models.models_dir.join(&model.name);
                if local.is_dir() {
                    local.to_string_lossy().to_string()
                } else {
                    model.repo_id.clone()
                }
            }
            None => requested.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.candidate_timeout(), Some(Duration::from_secs(120)));
        assert!(config.processing.normalize_embeddings);
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.processing.max_workers, 4);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.models.embedding_model, config.models.embedding_model);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.processing.max_workers = 0;
        config.save_to(&path).unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ResumeRankerError::Configuration(_))));
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let mut config = Config::default();
        config.processing.candidate_timeout_secs = 0;
        assert_eq!(config.candidate_timeout(), None);
    }

    #[test]
    fn test_resolve_falls_back_to_repo_id() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.models.models_dir = temp_dir.path().to_path_buf();

        assert_eq!(config.resolve_embedding_model(), "minishlab/potion-base-8M");

        std::fs::create_dir_all(temp_dir.path().join("potion-base-8M")).unwrap();
        let resolved = config.resolve_embedding_model();
        assert!(resolved.ends_with("potion-base-8M"));
        assert!(Path::new(&resolved).is_dir());
    }
}
