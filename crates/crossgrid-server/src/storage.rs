use std::path::{Path, PathBuf};

use crossgrid_core::GridDocument;
use tokio::fs;

use crate::error::AppError;

const EXTENSION: &str = ".json";

/// Puzzle documents stored as `<name>.json` files in one directory
#[derive(Debug, Clone)]
pub struct PuzzleStore {
    dir: PathBuf,
}

impl PuzzleStore {
    /// Open the store, creating its directory if needed
    pub async fn open(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        tracing::info!("Puzzle directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reject anything but a plain `*.json` file name
    pub fn validate_name(name: &str) -> Result<(), AppError> {
        let stem = name.strip_suffix(EXTENSION).unwrap_or_default();
        let valid = !stem.is_empty()
            && !name.starts_with('.')
            && !name.contains("..")
            && !name.contains(['/', '\\', '\0']);
        if valid {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!("Invalid puzzle name: {name}")))
        }
    }

    /// Names of all stored puzzles, sorted
    pub async fn list(&self) -> Result<Vec<String>, AppError> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if Self::validate_name(name).is_ok() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub async fn load(&self, name: &str) -> Result<Option<GridDocument>, AppError> {
        Self::validate_name(name)?;
        let text = match fs::read_to_string(self.dir.join(name)).await {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(GridDocument::from_json(&text)?))
    }

    /// Validate the document's shape and write it, replacing any previous version
    pub async fn save(&self, name: &str, document: &GridDocument) -> Result<(), AppError> {
        Self::validate_name(name)?;
        document.validate()?;
        fs::write(self.dir.join(name), document.to_json()?).await?;
        tracing::debug!(name, rows = document.0.len(), "puzzle saved");
        Ok(())
    }
}
