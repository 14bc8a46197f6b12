use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Region};
use crate::config::EditorConfig;
use crate::document::GridDocument;
use crate::error::{Diagnostic, DiagnosticKind, GridError, ListenerFault, TransportError};
use crate::export::{self, ExportSheet};
use crate::grid::Grid;
use crate::notify::Notifier;
use crate::state::{
    key_to_action, resolve_step, CellPosition, EditorState, Focus, Key, Modifiers, NavAction,
    NavStep, Step,
};
use crate::sync::{self, CellView, EditOrigin, NullView, Reconciled};
use crate::transfer::{self, TransferResponse, Transport};

/// What the host should do with the native key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyOutcome {
    /// Suppress the host's default handling (caret movement, deletion, newline)
    pub suppress_default: bool,
}

impl KeyOutcome {
    pub fn suppressed() -> Self {
        Self {
            suppress_default: true,
        }
    }

    pub fn passed() -> Self {
        Self::default()
    }
}

/// Pointer button of a mouse event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
    Other(i16),
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => PointerButton::Primary,
            1 => PointerButton::Auxiliary,
            2 => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }
}

/// Interactive crossword grid: matrix store, cell sync, navigation,
/// selection and change notification behind one owner.
pub struct GridModel<V: CellView = NullView> {
    grid: Grid,
    view: V,
    state: EditorState,
    notifier: Notifier,
    config: EditorConfig,
    diagnostics: Vec<Diagnostic>,
}

impl<V: CellView + std::fmt::Debug> std::fmt::Debug for GridModel<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridModel")
            .field("grid", &self.grid)
            .field("view", &self.view)
            .field("state", &self.state)
            .field("notifier", &self.notifier)
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

impl Default for GridModel<NullView> {
    fn default() -> Self {
        Self::new(EditorConfig::default(), NullView)
    }
}

impl<V: CellView> GridModel<V> {
    /// Create a model with an empty grid of the configured size and draw it
    pub fn new(config: EditorConfig, view: V) -> Self {
        let mut model = Self {
            grid: Grid::new(config.height, config.width),
            view,
            state: EditorState::new(),
            notifier: Notifier::new(),
            config,
            diagnostics: Vec::new(),
        };
        model.draw();
        model
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn value_at(&self, row: usize, col: usize) -> String {
        self.grid.value_at(row, col)
    }

    pub fn entry_at(&self, row: usize, col: usize) -> char {
        self.grid.entry_at(row, col)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    // ---------------------------------------------------------------------
    // Listeners
    // ---------------------------------------------------------------------

    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut() -> Result<(), ListenerFault> + 'static,
    {
        self.notifier.on_change(Box::new(listener));
    }

    pub fn on_selection_complete<F>(&mut self, listener: F)
    where
        F: FnMut(&str) -> Result<(), ListenerFault> + 'static,
    {
        self.notifier.on_selection_complete(Box::new(listener));
    }

    /// Fire change listeners, recording any that fail
    pub fn notify_change(&mut self) {
        let faults = self.notifier.notify_change();
        self.record_faults(faults);
    }

    fn record_faults(&mut self, faults: Vec<ListenerFault>) {
        for fault in faults {
            self.record_fault(fault);
        }
    }

    /// Record a listener failure that was isolated from the other listeners
    pub fn record_fault(&mut self, fault: ListenerFault) {
        tracing::warn!("{}", fault);
        self.diagnostics
            .push(Diagnostic::new(DiagnosticKind::Listener, fault.to_string()));
    }

    /// Record a failure caught at a boundary operation
    pub fn report(&mut self, kind: DiagnosticKind, err: &GridError) {
        tracing::error!("{}: {}", kind, err);
        self.diagnostics.push(Diagnostic::new(kind, err.to_string()));
    }

    // ---------------------------------------------------------------------
    // Matrix store and cell sync
    // ---------------------------------------------------------------------

    /// Set a cell programmatically and reconcile its view.
    ///
    /// Does not notify; callers decide when a batch of changes is complete.
    /// Returns false for coordinates outside the grid.
    pub fn set_value(&mut self, row: usize, col: usize, value: &str) -> bool {
        self.apply_value(CellPosition::new(row, col), value, EditOrigin::Load)
    }

    fn apply_value(&mut self, pos: CellPosition, value: &str, origin: EditOrigin) -> bool {
        let Some(current) = self.grid.get(pos) else {
            return false;
        };
        let reconciled = sync::reconcile(pos, current, value, origin);
        self.commit(pos, reconciled);
        true
    }

    fn commit(&mut self, pos: CellPosition, reconciled: Reconciled) {
        let Reconciled { cell, focus } = reconciled;
        self.write_cell(pos, cell);
        if let Some(focus) = focus {
            self.move_focus(focus);
        }
    }

    fn write_cell(&mut self, pos: CellPosition, cell: Cell) {
        self.view.set_cell_view(pos, &cell);
        self.restyle(pos, cell);
    }

    /// Store and classify without rebuilding the view's editable regions
    fn restyle(&mut self, pos: CellPosition, cell: Cell) {
        self.view.classify(pos, cell.class());
        self.grid.set(pos, cell);
    }

    fn move_focus(&mut self, focus: Focus) {
        self.state.focus = Some(focus);
        self.view.focus_subregion(focus.pos, focus.region);
    }

    /// Content edit of a whole (unsplit) cell, as typed by the user
    pub fn input(&mut self, row: usize, col: usize, text: &str) {
        self.clear_highlights();
        if self.apply_value(CellPosition::new(row, col), text, EditOrigin::Edit) {
            self.notify_change();
        }
    }

    /// Content edit inside one half of a split cell
    pub fn input_region(&mut self, row: usize, col: usize, region: Region, text: &str) {
        self.clear_highlights();
        let pos = CellPosition::new(row, col);
        let Some(cell) = self
            .grid
            .get(pos)
            .and_then(|current| sync::reconcile_region(current, region, text))
        else {
            return;
        };
        // The halves already show the typed text
        self.restyle(pos, cell);
        self.notify_change();
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    /// The host reports that a cell, or one half of it, received focus
    pub fn focus_cell(&mut self, row: usize, col: usize, region: Option<Region>) {
        let pos = CellPosition::new(row, col);
        let Some(cell) = self.grid.get(pos) else {
            return;
        };
        self.state.focus = Some(Focus { pos, region }.fitted_to(cell));
    }

    pub fn focus(&self) -> Option<Focus> {
        self.state.focus
    }

    /// Handle a keydown on the focused cell
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> KeyOutcome {
        self.clear_highlights();
        let Some(focus) = self.state.focus else {
            return KeyOutcome::passed();
        };
        match key_to_action(key, modifiers) {
            NavAction::Erase => self.erase(focus),
            NavAction::SuppressEnter => KeyOutcome::suppressed(),
            NavAction::Move { step, extend } => self.step(focus, step, extend),
            NavAction::None => KeyOutcome::passed(),
        }
    }

    /// Handle a keyup; releasing Shift finishes a keyboard selection
    pub fn key_up(&mut self, key: Key) {
        if key != Key::Shift {
            return;
        }
        if let Some(pos) = self.state.focused_cell() {
            self.selection_stop(pos);
        }
    }

    fn erase(&mut self, focus: Focus) -> KeyOutcome {
        let Some(cell) = self.grid.get(focus.pos) else {
            return KeyOutcome::passed();
        };

        if !cell.is_split() {
            if cell.char_len() != 1 {
                return KeyOutcome::passed();
            }
            self.write_cell(focus.pos, Cell::Empty);
            self.notify_change();
            return KeyOutcome::suppressed();
        }

        // Removing an empty half leaves a hint, so listeners are not told
        let Some(region) = focus.region else {
            return KeyOutcome::passed();
        };
        if cell.region_text(region).is_some_and(|text| !text.is_empty()) {
            return KeyOutcome::passed();
        }
        match sync::collapse(focus.pos, cell, region) {
            Some(reconciled) => {
                self.commit(focus.pos, reconciled);
                KeyOutcome::suppressed()
            }
            None => KeyOutcome::passed(),
        }
    }

    fn step(&mut self, focus: Focus, step: Step, extend: bool) -> KeyOutcome {
        match resolve_step(&self.grid, focus, step) {
            NavStep::WithinCell(target) => self.move_focus(target),
            NavStep::ToCell(target) => {
                self.move_focus(target);
                if extend {
                    if !self.state.is_selecting() {
                        self.selection_start(focus.pos);
                    }
                    self.selection_update(target.pos);
                }
            }
            NavStep::OutOfBounds => {}
        }
        KeyOutcome::suppressed()
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    pub fn pointer_down(&mut self, row: usize, col: usize, button: PointerButton) {
        let pos = CellPosition::new(row, col);
        if button == PointerButton::Primary && self.grid.contains(pos) {
            self.selection_start(pos);
        }
    }

    pub fn pointer_enter(&mut self, row: usize, col: usize) {
        let pos = CellPosition::new(row, col);
        if self.state.is_selecting() && self.grid.contains(pos) {
            self.selection_update(pos);
        }
    }

    pub fn pointer_up(&mut self, row: usize, col: usize, button: PointerButton) {
        let pos = CellPosition::new(row, col);
        if button == PointerButton::Primary && self.grid.contains(pos) {
            self.selection_stop(pos);
        }
    }

    pub fn selection_start(&mut self, pos: CellPosition) {
        self.state.selection.start(pos);
        self.clear_highlights();
    }

    pub fn selection_update(&mut self, pos: CellPosition) {
        let Some(run) = self.state.selection.update(pos) else {
            return;
        };
        let run = run.to_vec();
        self.show_run(run);
    }

    /// Finish the selection at `pos`; a run of two or more cells is reported
    /// to selection listeners as the word formed by its entries.
    pub fn selection_stop(&mut self, pos: CellPosition) {
        let Some(run) = self.state.selection.stop(pos) else {
            return;
        };
        self.show_run(run.clone());

        if run.len() > 1 {
            let word: String = run
                .iter()
                .map(|p| self.grid.entry_at(p.row, p.col))
                .collect();
            tracing::debug!(word = %word, cells = run.len(), "selection complete");
            let faults = self.notifier.notify_selection(&word);
            self.record_faults(faults);
        }
    }

    fn show_run(&mut self, run: Vec<CellPosition>) {
        self.clear_highlights();
        if run.len() > 1 {
            self.view.highlight(&run);
            self.state.highlighted = run;
        }
    }

    /// Remove all selection highlighting
    pub fn clear_highlights(&mut self) {
        self.state.highlighted.clear();
        self.view.clear_highlights();
    }

    pub fn highlighted(&self) -> &[CellPosition] {
        &self.state.highlighted
    }

    // ---------------------------------------------------------------------
    // Structural operations
    // ---------------------------------------------------------------------

    /// Send the whole grid to the view and notify listeners
    fn draw(&mut self) {
        let (height, width) = (self.grid.height(), self.grid.width());
        self.view.redraw(height, width);
        for (r, row) in self.grid.rows().iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let pos = CellPosition::new(r, c);
                self.view.set_cell_view(pos, cell);
                self.view.classify(pos, cell.class());
            }
        }
        self.state.reset_for_size(height, width);
        self.refit_focus();
        tracing::debug!(height, width, "grid drawn");
        self.notify_change();
    }

    /// A kept focus may now sit on a cell that gained or lost its halves
    fn refit_focus(&mut self) {
        let Some(focus) = self.state.focus else {
            return;
        };
        let Some(cell) = self.grid.get(focus.pos) else {
            return;
        };
        let fitted = focus.fitted_to(cell);
        if fitted != focus {
            self.move_focus(fitted);
        }
    }

    pub fn add_row(&mut self) {
        self.grid.add_row();
        self.draw();
    }

    pub fn add_column(&mut self) {
        self.grid.add_column();
        self.draw();
    }

    pub fn remove_row(&mut self) {
        if self.grid.remove_row() {
            self.draw();
        }
    }

    pub fn remove_column(&mut self) {
        if self.grid.remove_column() {
            self.draw();
        }
    }

    pub fn shift_left(&mut self) {
        self.grid.shift_left();
        self.draw();
    }

    pub fn shift_right(&mut self) {
        self.grid.shift_right();
        self.draw();
    }

    pub fn shift_up(&mut self) {
        self.grid.shift_up();
        self.draw();
    }

    pub fn shift_down(&mut self) {
        self.grid.shift_down();
        self.draw();
    }

    pub fn resize(&mut self, height: usize, width: usize) {
        self.grid.resize(height, width);
        self.draw();
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.draw();
    }

    /// Replace the whole matrix
    pub fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.draw();
    }

    // ---------------------------------------------------------------------
    // Serialization and transfer
    // ---------------------------------------------------------------------

    pub fn to_document(&self) -> GridDocument {
        GridDocument::from(&self.grid)
    }

    pub fn to_json(&self) -> Result<String, GridError> {
        self.to_document().to_json()
    }

    /// Replace the grid from a JSON document; the grid is untouched on error
    pub fn load_json(&mut self, json: &str) -> Result<(), GridError> {
        let grid = Grid::try_from(GridDocument::from_json(json)?)?;
        self.replace_grid(grid);
        Ok(())
    }

    /// GET a document and replace the grid with it; false on failure
    pub async fn load<T: Transport>(&mut self, transport: &T, url: &str) -> bool {
        let response = transport.get(url).await;
        self.apply_load_response(response)
    }

    /// Second half of [`load`](Self::load) for hosts that fetch on their own
    pub fn apply_load_response(
        &mut self,
        response: Result<TransferResponse, TransportError>,
    ) -> bool {
        match transfer::decode_load(response).and_then(Grid::try_from) {
            Ok(grid) => {
                self.replace_grid(grid);
                true
            }
            Err(err) => {
                self.report(DiagnosticKind::Load, &err);
                false
            }
        }
    }

    /// POST the grid as JSON; returns the acknowledgement body on success
    pub async fn save<T: Transport>(&mut self, transport: &T, url: &str) -> Option<String> {
        let body = match self.to_json() {
            Ok(body) => body,
            Err(err) => {
                self.report(DiagnosticKind::Save, &err);
                return None;
            }
        };
        let response = transport.post_json(url, body).await;
        self.apply_save_response(response)
    }

    pub fn apply_save_response(
        &mut self,
        response: Result<TransferResponse, TransportError>,
    ) -> Option<String> {
        match response
            .map_err(GridError::from)
            .and_then(TransferResponse::into_success_body)
        {
            Ok(ack) => Some(ack),
            Err(err) => {
                self.report(DiagnosticKind::Save, &err);
                None
            }
        }
    }

    /// List puzzle documents from the configured catalog endpoint.
    ///
    /// Failures are recorded and yield an empty list.
    pub async fn fetch_catalog<T: Transport>(&mut self, transport: &T) -> Vec<String> {
        let endpoint = self.config.catalog_endpoint.clone();
        match transfer::fetch_catalog(transport, &endpoint).await {
            Ok(files) => files,
            Err(err) => {
                self.report(DiagnosticKind::Catalog, &err);
                Vec::new()
            }
        }
    }

    pub fn apply_catalog_response(
        &mut self,
        response: Result<TransferResponse, TransportError>,
    ) -> Vec<String> {
        let parsed = response
            .map_err(GridError::from)
            .and_then(TransferResponse::into_success_body)
            .and_then(|body| serde_json::from_str(&body).map_err(GridError::from));
        match parsed {
            Ok(files) => files,
            Err(err) => {
                self.report(DiagnosticKind::Catalog, &err);
                Vec::new()
            }
        }
    }

    // ---------------------------------------------------------------------
    // Export
    // ---------------------------------------------------------------------

    /// Export surface: full size, no highlights, solution letters blanked
    pub fn export_sheet(&self) -> ExportSheet {
        export::prepare(&self.grid)
    }
}
