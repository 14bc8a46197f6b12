use serde::{Deserialize, Serialize};

use super::input::Step;
use super::selection::CellPosition;
use crate::cell::{Cell, Region};
use crate::grid::Grid;

/// The editable region that currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Focus {
    pub pos: CellPosition,
    /// Set when a half of a split cell is focused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
}

impl Focus {
    pub fn cell(pos: CellPosition) -> Self {
        Self { pos, region: None }
    }

    pub fn region(pos: CellPosition, region: Region) -> Self {
        Self {
            pos,
            region: Some(region),
        }
    }

    /// Same cell, with the region adjusted to what `cell` offers
    pub fn fitted_to(self, cell: &Cell) -> Self {
        match (cell.is_split(), self.region) {
            (true, None) => Self::region(self.pos, Region::Upper),
            (false, Some(_)) => Self::cell(self.pos),
            _ => self,
        }
    }

    /// Focus target when entering `cell` with an arrow key.
    ///
    /// Split cells are entered at their lower half when moving up and at the
    /// upper half otherwise.
    pub fn entering(pos: CellPosition, cell: &Cell, step: Step) -> Self {
        if !cell.is_split() {
            return Self::cell(pos);
        }
        match step {
            Step::Up => Self::region(pos, Region::Lower),
            _ => Self::region(pos, Region::Upper),
        }
    }
}

/// Result of resolving an arrow key against the focused cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStep {
    /// Focus moves between the halves of the same split cell
    WithinCell(Focus),
    /// Focus moves to another grid cell
    ToCell(Focus),
    /// The step would leave the grid
    OutOfBounds,
}

/// Resolve where an arrow key takes the focus.
///
/// Up and Down first move between the halves of a split cell. Otherwise the
/// target is found in row-major linear order, so Left and Right wrap across
/// row ends while Up and Down stop at the top and bottom edges.
pub fn resolve_step(grid: &Grid, focus: Focus, step: Step) -> NavStep {
    if let (Some(region), Some(cell)) = (focus.region, grid.get(focus.pos)) {
        if cell.is_split() {
            let neighbour = match step {
                Step::Up => region.above(),
                Step::Down => region.below(),
                Step::Left | Step::Right => None,
            };
            if let Some(neighbour) = neighbour {
                return NavStep::WithinCell(Focus::region(focus.pos, neighbour));
            }
        }
    }

    let index = grid.linear_index(focus.pos) as isize + step.linear_offset(grid.width());
    match grid.position_at(index) {
        Some(target) => {
            let cell = grid.get(target).cloned().unwrap_or_default();
            NavStep::ToCell(Focus::entering(target, &cell, step))
        }
        None => NavStep::OutOfBounds,
    }
}
