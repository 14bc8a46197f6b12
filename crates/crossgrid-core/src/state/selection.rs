use serde::{Deserialize, Serialize};

/// Represents a single cell position in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn origin() -> Self {
        Self { row: 0, col: 0 }
    }
}

impl From<(usize, usize)> for CellPosition {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

/// Orientation of a selected run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Dominant axis of a drag; equal deltas resolve to horizontal
    pub fn dominant(anchor: CellPosition, current: CellPosition) -> Self {
        if anchor.row.abs_diff(current.row) > anchor.col.abs_diff(current.col) {
            Axis::Vertical
        } else {
            Axis::Horizontal
        }
    }
}

/// Straight run of cells between an anchor and the current pointer cell.
///
/// The run stays on the anchor's row (horizontal) or column (vertical) and
/// is ordered top-to-bottom or left-to-right regardless of drag direction.
pub fn linear_run(anchor: CellPosition, current: CellPosition) -> Vec<CellPosition> {
    match Axis::dominant(anchor, current) {
        Axis::Vertical => {
            let from = anchor.row.min(current.row);
            let to = anchor.row.max(current.row);
            (from..=to).map(|row| CellPosition::new(row, anchor.col)).collect()
        }
        Axis::Horizontal => {
            let from = anchor.col.min(current.col);
            let to = anchor.col.max(current.col);
            (from..=to).map(|col| CellPosition::new(anchor.row, col)).collect()
        }
    }
}

/// Drag selection state machine: Idle -> Selecting -> Idle
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinearSelection {
    #[default]
    Idle,
    Selecting {
        anchor: CellPosition,
        current: CellPosition,
        run: Vec<CellPosition>,
    },
}

impl LinearSelection {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self, LinearSelection::Selecting { .. })
    }

    pub fn anchor(&self) -> Option<CellPosition> {
        match self {
            LinearSelection::Idle => None,
            LinearSelection::Selecting { anchor, .. } => Some(*anchor),
        }
    }

    pub fn current(&self) -> Option<CellPosition> {
        match self {
            LinearSelection::Idle => None,
            LinearSelection::Selecting { current, .. } => Some(*current),
        }
    }

    /// Cells in the current run (empty while idle)
    pub fn run(&self) -> &[CellPosition] {
        match self {
            LinearSelection::Idle => &[],
            LinearSelection::Selecting { run, .. } => run,
        }
    }

    /// Begin selecting at `pos`, discarding any previous run
    pub fn start(&mut self, pos: CellPosition) {
        *self = LinearSelection::Selecting {
            anchor: pos,
            current: pos,
            run: Vec::new(),
        };
    }

    /// Move the current end and recompute the run; `None` while idle
    pub fn update(&mut self, pos: CellPosition) -> Option<&[CellPosition]> {
        match self {
            LinearSelection::Idle => None,
            LinearSelection::Selecting {
                anchor,
                current,
                run,
            } => {
                *current = pos;
                *run = linear_run(*anchor, pos);
                Some(run.as_slice())
            }
        }
    }

    /// Final update at `pos`, then reset to idle, returning the finished run
    pub fn stop(&mut self, pos: CellPosition) -> Option<Vec<CellPosition>> {
        self.update(pos)?;
        match std::mem::take(self) {
            LinearSelection::Selecting { run, .. } => Some(run),
            LinearSelection::Idle => None,
        }
    }

    /// Abandon an in-progress selection without producing a run
    pub fn cancel(&mut self) {
        *self = LinearSelection::Idle;
    }
}
