pub mod focus;
pub mod input;
pub mod selection;

pub use focus::{resolve_step, Focus, NavStep};
pub use input::{key_to_action, Key, Modifiers, NavAction, Step};
pub use selection::{linear_run, Axis, CellPosition, LinearSelection};

use serde::{Deserialize, Serialize};

/// Transient interaction state owned by a grid model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorState {
    pub focus: Option<Focus>,
    pub selection: LinearSelection,
    /// Cells currently drawn with the selection highlight
    pub highlighted: Vec<CellPosition>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selecting(&self) -> bool {
        self.selection.is_selecting()
    }

    pub fn focused_cell(&self) -> Option<CellPosition> {
        self.focus.map(|f| f.pos)
    }

    /// Forget selection and highlights; keep focus only if it is still in bounds
    pub fn reset_for_size(&mut self, height: usize, width: usize) {
        self.selection.cancel();
        self.highlighted.clear();
        if let Some(focus) = self.focus {
            if focus.pos.row >= height || focus.pos.col >= width {
                self.focus = None;
            }
        }
    }
}
