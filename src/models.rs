//! Local store of downloaded Model2Vec models

use crate::config::AvailableModel;
use crate::error::{Result, ResumeRankerError};
use hf_hub::api::tokio::Api;
use log::info;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files `StaticModel::from_pretrained` needs from a local directory
const REQUIRED_FILES: [&str; 3] = ["tokenizer.json", "model.safetensors", "config.json"];

pub struct ModelStore {
    models_dir: PathBuf,
    available_models: Vec<AvailableModel>,
}

impl ModelStore {
    pub fn new(models_dir: PathBuf, available_models: Vec<AvailableModel>) -> Self {
        Self {
            models_dir,
            available_models,
        }
    }

    pub fn available_models(&self) -> &[AvailableModel] {
        &self.available_models
    }

    /// Look a model up by short name or repo id
    pub fn get_model_info(&self, name: &str) -> Option<&AvailableModel> {
        self.available_models
            .iter()
            .find(|m| m.name == name || m.repo_id == name)
    }

    pub fn model_dir(&self, model: &AvailableModel) -> PathBuf {
        self.models_dir.join(&model.name)
    }

    pub fn is_downloaded(&self, model: &AvailableModel) -> bool {
        is_valid_model_dir(&self.model_dir(model))
    }

    pub async fn download(&self, name: &str, force: bool) -> Result<PathBuf> {
        let model = self
            .get_model_info(name)
            .ok_or_else(|| ResumeRankerError::ModelNotFound(name.to_string()))?;
        let model_dir = self.model_dir(model);

        if !force && self.is_downloaded(model) {
            info!("Model '{}' already present at {}", model.name, model_dir.display());
            return Ok(model_dir);
        }

        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| ResumeRankerError::ModelLoading(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.repo(hf_hub::Repo::model(model.repo_id.clone()));

        info!("Downloading {} ({} MB) from {}", model.name, model.size_mb, model.repo_id);

        for file in REQUIRED_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                ResumeRankerError::ModelLoading(format!("Failed to download {}: {}", file, e))
            })?;
            fs::copy(&cached, model_dir.join(file)).await?;
            info!("  downloaded {}", file);
        }

        Ok(model_dir)
    }

    /// Delete a downloaded model; returns whether anything was removed
    pub async fn remove(&self, name: &str) -> Result<bool> {
        let model = self
            .get_model_info(name)
            .ok_or_else(|| ResumeRankerError::ModelNotFound(name.to_string()))?;
        let model_dir = self.model_dir(model);

        if !model_dir.exists() {
            return Ok(false);
        }

        fs::remove_dir_all(&model_dir).await?;
        Ok(true)
    }
}

pub fn is_valid_model_dir(path: &Path) -> bool {
    path.is_dir() && REQUIRED_FILES.iter().all(|file| path.join(file).is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn store(dir: &Path) -> ModelStore {
        ModelStore::new(dir.to_path_buf(), Config::default().models.available_models)
    }

    #[test]
    fn test_lookup_by_name_or_repo() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path());

        assert!(store.get_model_info("potion-base-8M").is_some());
        assert!(store.get_model_info("minishlab/M2V_base_output").is_some());
        assert!(store.get_model_info("nope").is_none());
    }

    #[test]
    fn test_download_detection_requires_all_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path());
        let model = store.get_model_info("m2v-base").unwrap().clone();
        let dir = store.model_dir(&model);

        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("tokenizer.json"), "{}").unwrap();
        assert!(!store.is_downloaded(&model));

        std::fs::write(dir.join("model.safetensors"), "").unwrap();
        std::fs::write(dir.join("config.json"), "{}").unwrap();
        assert!(store.is_downloaded(&model));
    }

    #[tokio::test]
    async fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path());

        assert!(!store.remove("m2v-large").await.unwrap());

        std::fs::create_dir_all(temp_dir.path().join("m2v-large")).unwrap();
        assert!(store.remove("m2v-large").await.unwrap());
        assert!(!temp_dir.path().join("m2v-large").exists());

        assert!(matches!(
            store.remove("unknown").await,
            Err(ResumeRankerError::ModelNotFound(_))
        ));
    }
}
