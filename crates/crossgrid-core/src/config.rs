use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::grid::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Supersampling factor applied when exporting the grid as an image
pub const DEFAULT_EXPORT_SCALE: u32 = 4;
/// Side length of one square in export pixels before supersampling
pub const DEFAULT_CELL_SIZE: u32 = 40;
/// Largest accepted supersampling factor
pub const MAX_EXPORT_SCALE: u32 = 16;
/// Largest accepted square side before supersampling
pub const MAX_CELL_SIZE: u32 = 512;
/// Endpoint listing the available puzzle documents
pub const DEFAULT_CATALOG_ENDPOINT: &str = "/puzzle-options";

/// Editor settings; every field falls back to its default when omitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub width: usize,
    pub height: usize,
    pub export_scale: u32,
    pub cell_size: u32,
    pub catalog_endpoint: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            export_scale: DEFAULT_EXPORT_SCALE,
            cell_size: DEFAULT_CELL_SIZE,
            catalog_endpoint: DEFAULT_CATALOG_ENDPOINT.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse from JSON; an empty string yields the defaults
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the export settings are within their supported ranges
    pub fn validate(&self) -> Result<(), GridError> {
        if !(1..=MAX_EXPORT_SCALE).contains(&self.export_scale) {
            return Err(GridError::InvalidArgument(format!(
                "exportScale must be between 1 and {MAX_EXPORT_SCALE}, got {}",
                self.export_scale
            )));
        }
        if !(1..=MAX_CELL_SIZE).contains(&self.cell_size) {
            return Err(GridError::InvalidArgument(format!(
                "cellSize must be between 1 and {MAX_CELL_SIZE}, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!((config.height, config.width), (10, 10));
        assert_eq!(config.export_scale, 4);
        assert_eq!(config.catalog_endpoint, "/puzzle-options");
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(r#"{"width": 15, "exportScale": 2}"#).unwrap();
        assert_eq!(config.width, 15);
        assert_eq!(config.height, 10);
        assert_eq!(config.export_scale, 2);
        assert_eq!(config.cell_size, DEFAULT_CELL_SIZE);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(EditorConfig::from_json("  ").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_export_bounds() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"cellSize": 2000000000}"#),
            Err(GridError::InvalidArgument(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"exportScale": 0}"#),
            Err(GridError::InvalidArgument(_))
        ));
        let config = EditorConfig::from_json(r#"{"cellSize": 512, "exportScale": 16}"#).unwrap();
        assert_eq!((config.cell_size, config.export_scale), (512, 16));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            EditorConfig::from_json("{width:"),
            Err(GridError::Json(_))
        ));
    }
}
