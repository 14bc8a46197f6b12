use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::GridError;
use crate::grid::Grid;

/// Persisted form of a grid: rows of raw cell values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridDocument(pub Vec<Vec<String>>);

impl GridDocument {
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, GridError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check the shape a grid requires: at least one cell, equal row lengths
    pub fn validate(&self) -> Result<(), GridError> {
        let Some(first) = self.0.first() else {
            return Err(GridError::InvalidDocument("document has no rows".to_string()));
        };
        if first.is_empty() {
            return Err(GridError::InvalidDocument("document has no columns".to_string()));
        }
        if let Some((index, row)) = self
            .0
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != first.len())
        {
            return Err(GridError::InvalidDocument(format!(
                "row {} has {} columns, expected {}",
                index,
                row.len(),
                first.len()
            )));
        }
        Ok(())
    }
}

impl TryFrom<GridDocument> for Grid {
    type Error = GridError;

    fn try_from(doc: GridDocument) -> Result<Self, Self::Error> {
        doc.validate()?;
        let rows = doc
            .0
            .iter()
            .map(|row| row.iter().map(|raw| Cell::parse(raw)).collect())
            .collect();
        Ok(Grid::from_rows_unchecked(rows))
    }
}

impl From<&Grid> for GridDocument {
    fn from(grid: &Grid) -> Self {
        GridDocument(
            grid.rows()
                .iter()
                .map(|row| row.iter().map(Cell::raw_value).collect())
                .collect(),
        )
    }
}

impl From<Grid> for GridDocument {
    fn from(grid: Grid) -> Self {
        GridDocument::from(&grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CellPosition;

    #[test]
    fn test_parse_document() {
        let json = r##"[["C","A","T"],["#","arrow-down","a|b"]]"##;
        let grid: Grid = serde_json::from_str(json).unwrap();
        assert_eq!((grid.height(), grid.width()), (2, 3));
        assert_eq!(grid.entry_at(0, 1), 'A');
        assert_eq!(grid.get(CellPosition::new(1, 0)), Some(&Cell::Blocked));
        assert!(grid.get(CellPosition::new(1, 2)).unwrap().is_split());
    }

    #[test]
    fn test_serialize_preserves_raw_values() {
        let json = r##"[["","#","x|"],["hint","arrow-left-up","Z"]]"##;
        let grid: Grid = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&grid).unwrap(), json);
    }

    #[test]
    fn test_rejects_empty_document() {
        let err = serde_json::from_str::<Grid>("[]").unwrap_err();
        assert!(err.to_string().contains("no rows"));

        let doc = GridDocument(vec![vec![]]);
        assert!(matches!(doc.validate(), Err(GridError::InvalidDocument(_))));
    }

    #[test]
    fn test_rejects_ragged_document() {
        let doc = GridDocument::from_json(r#"[["a","b"],["c"]]"#).unwrap();
        let err = Grid::try_from(doc).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid grid document: row 1 has 1 columns, expected 2"
        );
    }

    #[test]
    fn test_rejects_wrong_json_shape() {
        assert!(matches!(
            GridDocument::from_json(r#"{"cells": []}"#),
            Err(GridError::Json(_))
        ));
    }
}
