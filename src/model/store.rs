//! Filesystem store of persisted sequence models
//!
//! Models are addressed by identifier (`{building}{tower}_{season}_lstm`)
//! and stored as `{root}/{identifier}.bin`.

use super::network::SequenceModel;
use crate::error::{Result, TransferError};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ModelStore {
    root: PathBuf,
}

impl ModelStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.root.join(format!("{}.bin", identifier))
    }

    pub fn exists(&self, identifier: &str) -> bool {
        self.path_for(identifier).is_file()
    }

    /// Load a model; a missing file is a `MissingModel` error
    pub fn load(&self, identifier: &str) -> Result<SequenceModel> {
        let path = self.path_for(identifier);
        if !path.is_file() {
            return Err(TransferError::MissingModel {
                identifier: identifier.to_string(),
                path,
            });
        }

        let data = std::fs::read(&path)?;
        let model: SequenceModel = bincode::deserialize(&data)?;
        tracing::debug!(
            "Loaded model {} ({} parameters) from {}",
            identifier,
            model.num_parameters(),
            path.display()
        );
        Ok(model)
    }

    pub fn save(&self, identifier: &str, model: &SequenceModel) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path_for(identifier);
        let encoded = bincode::serialize(model)?;
        std::fs::write(&path, encoded)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LSTMConfig;
    use ndarray::Array3;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let model = SequenceModel::new(LSTMConfig::small(3));

        store.save("esb1_summer_lstm", &model).unwrap();
        assert!(store.exists("esb1_summer_lstm"));

        let loaded = store.load("esb1_summer_lstm").unwrap();
        let x = Array3::from_elem((2, 6, 3), 0.3);
        assert_eq!(model.forward(&x), loaded.forward(&x));
    }

    #[test]
    fn test_missing_model() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let err = store.load("esb9_winter_lstm").unwrap_err();
        assert!(
            matches!(err, TransferError::MissingModel { ref identifier, .. } if identifier == "esb9_winter_lstm")
        );
    }
}
