//! Reconciliation between cell values and their on-screen representation.
//!
//! The model never touches a rendering surface directly. It talks to a
//! [`CellView`], which a host implements over whatever surface it draws on.

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellClass, Region};
use crate::state::{CellPosition, Focus};

/// Capability interface a rendering host implements
pub trait CellView {
    /// Rebuild the cell's editable regions (one, or two stacked halves)
    fn set_cell_view(&mut self, pos: CellPosition, cell: &Cell);

    /// Move input focus to a cell, or to one half of a split cell
    fn focus_subregion(&mut self, pos: CellPosition, region: Option<Region>);

    /// Apply styling flags
    fn classify(&mut self, pos: CellPosition, class: CellClass);

    /// Highlight exactly these cells
    fn highlight(&mut self, cells: &[CellPosition]);

    fn clear_highlights(&mut self);

    /// The grid was resized or replaced; every cell will be re-sent
    fn redraw(&mut self, _height: usize, _width: usize) {}
}

/// View that renders nothing, for headless use
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl CellView for NullView {
    fn set_cell_view(&mut self, _pos: CellPosition, _cell: &Cell) {}
    fn focus_subregion(&mut self, _pos: CellPosition, _region: Option<Region>) {}
    fn classify(&mut self, _pos: CellPosition, _class: CellClass) {}
    fn highlight(&mut self, _cells: &[CellPosition]) {}
    fn clear_highlights(&mut self) {}
}

/// Editable layout of a rendered cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CellLayout {
    Single { text: String },
    Split { upper: String, lower: String },
}

impl From<&Cell> for CellLayout {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Split { upper, lower } => CellLayout::Split {
                upper: upper.clone(),
                lower: lower.clone(),
            },
            other => CellLayout::Single {
                text: other.raw_value(),
            },
        }
    }
}

/// A single instruction for a host that replays view changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ViewPatch {
    Redraw {
        height: usize,
        width: usize,
    },
    SetCell {
        row: usize,
        col: usize,
        layout: CellLayout,
    },
    Focus {
        row: usize,
        col: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        region: Option<Region>,
    },
    Classify {
        row: usize,
        col: usize,
        class: CellClass,
    },
    Highlight {
        cells: Vec<CellPosition>,
    },
    ClearHighlights,
}

/// View that records patches for later replay
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    patches: Vec<ViewPatch>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patches(&self) -> &[ViewPatch] {
        &self.patches
    }

    /// Hand over everything recorded so far
    pub fn drain(&mut self) -> Vec<ViewPatch> {
        std::mem::take(&mut self.patches)
    }

    /// Most recent focus instruction, if any
    pub fn last_focus(&self) -> Option<Focus> {
        self.patches.iter().rev().find_map(|patch| match patch {
            ViewPatch::Focus { row, col, region } => Some(Focus {
                pos: CellPosition::new(*row, *col),
                region: *region,
            }),
            _ => None,
        })
    }
}

impl CellView for RecordingView {
    fn set_cell_view(&mut self, pos: CellPosition, cell: &Cell) {
        self.patches.push(ViewPatch::SetCell {
            row: pos.row,
            col: pos.col,
            layout: CellLayout::from(cell),
        });
    }

    fn focus_subregion(&mut self, pos: CellPosition, region: Option<Region>) {
        self.patches.push(ViewPatch::Focus {
            row: pos.row,
            col: pos.col,
            region,
        });
    }

    fn classify(&mut self, pos: CellPosition, class: CellClass) {
        self.patches.push(ViewPatch::Classify {
            row: pos.row,
            col: pos.col,
            class,
        });
    }

    fn highlight(&mut self, cells: &[CellPosition]) {
        self.patches.push(ViewPatch::Highlight {
            cells: cells.to_vec(),
        });
    }

    fn clear_highlights(&mut self) {
        self.patches.push(ViewPatch::ClearHighlights);
    }

    fn redraw(&mut self, height: usize, width: usize) {
        self.patches.push(ViewPatch::Redraw { height, width });
    }
}

/// Where a value change came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
    /// Typed by the user; focus follows a change of layout
    Edit,
    /// Set programmatically or loaded; focus is left alone
    Load,
}

/// Outcome of reconciling a new value against a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub cell: Cell,
    /// Focus the host should move to, if the layout changed under an edit
    pub focus: Option<Focus>,
}

/// Reconcile an incoming whole-cell value.
///
/// A separator turns an unsplit cell into two halves with focus in the lower
/// one, where the separator was typed. A separator-free value collapses a
/// split cell back to one region, which takes the focus.
pub fn reconcile(
    pos: CellPosition,
    current: &Cell,
    incoming: &str,
    origin: EditOrigin,
) -> Reconciled {
    let cell = Cell::parse(incoming);
    let focus = match (origin, current.is_split(), cell.is_split()) {
        (EditOrigin::Edit, false, true) => Some(Focus::region(pos, Region::Lower)),
        (EditOrigin::Edit, true, false) => Some(Focus::cell(pos)),
        _ => None,
    };
    Reconciled { cell, focus }
}

/// Apply an input event from one half of a split cell.
///
/// The flattened value is rebuilt from the live halves. Returns `None` when
/// the cell is not split.
pub fn reconcile_region(current: &Cell, region: Region, text: &str) -> Option<Cell> {
    let Cell::Split { upper, lower } = current else {
        return None;
    };
    let (upper, lower) = match region {
        Region::Upper => (text.to_string(), lower.clone()),
        Region::Lower => (upper.clone(), text.to_string()),
    };
    Some(Cell::Split { upper, lower })
}

/// Remove one half of a split cell, leaving the other as a plain value
pub fn collapse(pos: CellPosition, current: &Cell, removed: Region) -> Option<Reconciled> {
    let remaining = current.region_text(removed.other())?;
    let cell = Cell::parse(remaining);
    let focus = if cell.is_split() {
        Focus::region(pos, Region::Lower)
    } else {
        Focus::cell(pos)
    };
    Some(Reconciled {
        cell,
        focus: Some(focus),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> CellPosition {
        CellPosition::new(2, 3)
    }

    fn split(upper: &str, lower: &str) -> Cell {
        Cell::Split {
            upper: upper.to_string(),
            lower: lower.to_string(),
        }
    }

    #[test]
    fn test_typing_separator_splits_and_focuses_lower() {
        let result = reconcile(pos(), &Cell::parse("ab"), "ab|", EditOrigin::Edit);
        assert_eq!(result.cell, split("ab", ""));
        assert_eq!(result.focus, Some(Focus::region(pos(), Region::Lower)));
    }

    #[test]
    fn test_loading_split_leaves_focus() {
        let result = reconcile(pos(), &Cell::Empty, "A|B", EditOrigin::Load);
        assert_eq!(result.cell, split("A", "B"));
        assert_eq!(result.cell.raw_value(), "A|B");
        assert_eq!(result.focus, None);
    }

    #[test]
    fn test_separator_free_value_collapses_split() {
        let result = reconcile(pos(), &split("A", "B"), "word", EditOrigin::Edit);
        assert_eq!(result.cell, Cell::Hint("word".to_string()));
        assert_eq!(result.focus, Some(Focus::cell(pos())));
    }

    #[test]
    fn test_plain_edit_keeps_focus() {
        let result = reconcile(pos(), &Cell::Empty, "K", EditOrigin::Edit);
        assert_eq!(result.cell, Cell::Letter('K'));
        assert_eq!(result.focus, None);
    }

    #[test]
    fn test_region_edit_rebuilds_value() {
        let cell = reconcile_region(&split("A", "B"), Region::Upper, "top").unwrap();
        assert_eq!(cell.raw_value(), "top|B");
        let cell = reconcile_region(&cell, Region::Lower, "").unwrap();
        assert_eq!(cell.raw_value(), "top|");
        assert!(reconcile_region(&Cell::Letter('A'), Region::Upper, "x").is_none());
    }

    #[test]
    fn test_collapse_keeps_other_half() {
        let result = collapse(pos(), &split("", "below"), Region::Upper).unwrap();
        assert_eq!(result.cell, Cell::Hint("below".to_string()));
        assert_eq!(result.focus, Some(Focus::cell(pos())));

        let result = collapse(pos(), &split("Q", ""), Region::Lower).unwrap();
        assert_eq!(result.cell, Cell::Letter('Q'));
        assert!(collapse(pos(), &Cell::Empty, Region::Lower).is_none());
    }

    #[test]
    fn test_recording_view() {
        let mut view = RecordingView::new();
        view.redraw(1, 2);
        view.set_cell_view(pos(), &split("a", "b"));
        view.focus_subregion(pos(), Some(Region::Lower));
        view.clear_highlights();

        assert_eq!(view.patches().len(), 4);
        assert_eq!(view.last_focus(), Some(Focus::region(pos(), Region::Lower)));
        assert_eq!(view.drain().len(), 4);
        assert!(view.patches().is_empty());
    }

    #[test]
    fn test_patch_json_shape() {
        let patch = ViewPatch::SetCell {
            row: 0,
            col: 1,
            layout: CellLayout::from(&split("a", "b")),
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "op": "setCell",
                "row": 0,
                "col": 1,
                "layout": { "kind": "split", "upper": "a", "lower": "b" }
            })
        );
    }
}
