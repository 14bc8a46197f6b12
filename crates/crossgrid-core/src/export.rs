//! Pre-render transform for image export.
//!
//! An export shows the puzzle, not its solution: only blocked squares and
//! hint annotations keep their content, and no selection highlight survives.

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellClass, Direction};
use crate::grid::Grid;

/// What an exported square displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExportContent {
    Blank,
    Text { text: String },
    Split { upper: String, lower: String },
    Arrow { direction: Direction },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportCell {
    pub class: CellClass,
    pub content: ExportContent,
}

impl ExportCell {
    fn from_cell(cell: &Cell) -> Self {
        let class = cell.class();
        let content = if !class.exports_text() {
            ExportContent::Blank
        } else {
            match cell {
                Cell::Split { upper, lower } => ExportContent::Split {
                    upper: upper.clone(),
                    lower: lower.clone(),
                },
                Cell::Directive(direction) => ExportContent::Arrow {
                    direction: *direction,
                },
                // Blocked squares are drawn filled; their marker is not text
                Cell::Blocked => ExportContent::Blank,
                other => ExportContent::Text {
                    text: other.raw_value(),
                },
            }
        };
        Self { class, content }
    }
}

/// Full, unclipped export surface in row-major order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSheet {
    pub height: usize,
    pub width: usize,
    pub cells: Vec<ExportCell>,
}

impl ExportSheet {
    pub fn cell(&self, row: usize, col: usize) -> Option<&ExportCell> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col)
    }
}

/// Build the export surface for the whole grid
pub fn prepare(grid: &Grid) -> ExportSheet {
    ExportSheet {
        height: grid.height(),
        width: grid.width(),
        cells: grid.rows().iter().flatten().map(ExportCell::from_cell).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(json: &str) -> ExportSheet {
        let grid: Grid = serde_json::from_str(json).unwrap();
        prepare(&grid)
    }

    #[test]
    fn test_solution_letters_are_blanked() {
        let sheet = sheet(r#"[["C","A","T"]]"#);
        assert!(sheet.cells.iter().all(|c| c.content == ExportContent::Blank));
    }

    #[test]
    fn test_hints_and_blocks_survive() {
        let sheet = sheet(r##"[["#","clue","up|down","arrow-right",""]]"##);
        assert!(sheet.cell(0, 0).unwrap().class.empty);
        assert_eq!(sheet.cell(0, 0).unwrap().content, ExportContent::Blank);
        assert_eq!(
            sheet.cell(0, 1).unwrap().content,
            ExportContent::Text { text: "clue".to_string() }
        );
        assert_eq!(
            sheet.cell(0, 2).unwrap().content,
            ExportContent::Split {
                upper: "up".to_string(),
                lower: "down".to_string()
            }
        );
        assert_eq!(
            sheet.cell(0, 3).unwrap().content,
            ExportContent::Arrow { direction: Direction::Right }
        );
        assert_eq!(sheet.cell(0, 4).unwrap().content, ExportContent::Blank);
    }

    #[test]
    fn test_sheet_is_full_size() {
        let grid = Grid::new(12, 15);
        let sheet = prepare(&grid);
        assert_eq!((sheet.height, sheet.width), (12, 15));
        assert_eq!(sheet.cells.len(), 180);
        assert!(sheet.cell(12, 0).is_none());
        assert!(sheet.cell(11, 14).is_some());
    }
}
