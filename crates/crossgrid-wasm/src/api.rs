use std::cell::{Cell, RefCell};
use std::rc::Rc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use crossgrid_core::{
    CellPosition, DiagnosticKind, EditorConfig, GridError, GridModel, Key, ListenerFault,
    Modifiers, PointerButton, RecordingView, Region, Transport, ViewPatch,
};
use crossgrid_render::{load_font, render_png, Font, RenderOptions};
use js_sys::{Function, Promise};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::transport::{describe, FetchTransport};

/// Structured error object for JavaScript
#[derive(Serialize)]
pub struct JsGridError {
    code: String,
    message: String,
}

impl From<&GridError> for JsGridError {
    fn from(err: &GridError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl JsGridError {
    fn from_error<E: std::fmt::Display>(err: E) -> JsValue {
        let error = Self {
            code: "ERROR".to_string(),
            message: err.to_string(),
        };
        serde_wasm_bindgen::to_value(&error).unwrap_or(JsValue::NULL)
    }
}

fn to_js_error(err: GridError) -> JsValue {
    let js_error = JsGridError::from(&err);
    serde_wasm_bindgen::to_value(&js_error).unwrap_or(JsValue::NULL)
}

fn patches_json(patches: &[ViewPatch]) -> String {
    serde_json::to_string(patches).unwrap_or_else(|_| "[]".to_string())
}

/// Result of a keydown for JavaScript
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyResponse {
    suppress_default: bool,
    patches: Vec<ViewPatch>,
}

fn parse_region(region: &str) -> Option<Region> {
    match region {
        "upper" => Some(Region::Upper),
        "lower" => Some(Region::Lower),
        _ => None,
    }
}

/// Notification raised inside the model, delivered once the model is released
#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Change,
    Selection(String),
}

/// Marks a load or save in flight; released on drop
struct TransferGuard<'a>(&'a Cell<bool>);

impl<'a> TransferGuard<'a> {
    fn acquire(busy: &'a Cell<bool>) -> Option<Self> {
        if busy.replace(true) {
            None
        } else {
            Some(Self(busy))
        }
    }
}

impl Drop for TransferGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

struct Shared {
    model: RefCell<GridModel<RecordingView>>,
    pending: Rc<RefCell<Vec<Pending>>>,
    change_listeners: RefCell<Vec<Function>>,
    selection_listeners: RefCell<Vec<Function>>,
    busy: Cell<bool>,
    font: RefCell<Option<Font>>,
}

impl Shared {
    fn new(config: EditorConfig) -> Self {
        let pending = Rc::new(RefCell::new(Vec::new()));
        let mut model = GridModel::new(config, RecordingView::new());

        // JS listeners may call back into the editor, so the model only queues
        let queue = Rc::clone(&pending);
        model.on_change(move || {
            queue.borrow_mut().push(Pending::Change);
            Ok(())
        });
        let queue = Rc::clone(&pending);
        model.on_selection_complete(move |word| {
            queue.borrow_mut().push(Pending::Selection(word.to_string()));
            Ok(())
        });

        Self {
            model: RefCell::new(model),
            pending,
            change_listeners: RefCell::new(Vec::new()),
            selection_listeners: RefCell::new(Vec::new()),
            busy: Cell::new(false),
            font: RefCell::new(None),
        }
    }

    /// Deliver queued notifications to the JS listeners
    fn dispatch(&self) {
        loop {
            let events = std::mem::take(&mut *self.pending.borrow_mut());
            if events.is_empty() {
                break;
            }
            for event in events {
                let faults = match &event {
                    Pending::Change => {
                        let listeners = self.change_listeners.borrow().clone();
                        call_each(&listeners, |f| f.call0(&JsValue::NULL).map(drop), describe)
                    }
                    Pending::Selection(word) => {
                        let listeners = self.selection_listeners.borrow().clone();
                        let word = JsValue::from_str(word);
                        call_each(
                            &listeners,
                            |f| f.call1(&JsValue::NULL, &word).map(drop),
                            describe,
                        )
                    }
                };
                for fault in faults {
                    web_sys::console::warn_1(&JsValue::from_str(&fault.to_string()));
                    self.model.borrow_mut().record_fault(fault);
                }
            }
        }
    }

    /// Run `f` on the model, then deliver the notifications it raised
    fn apply<R>(&self, f: impl FnOnce(&mut GridModel<RecordingView>) -> R) -> R {
        let result = f(&mut self.model.borrow_mut());
        self.dispatch();
        result
    }

    /// Like [`apply`](Self::apply), also handing over the recorded patches.
    /// Patches are taken before listeners run, so a listener calling back into
    /// the editor cannot claim them.
    fn with_model<R>(
        &self,
        f: impl FnOnce(&mut GridModel<RecordingView>) -> R,
    ) -> (R, Vec<ViewPatch>) {
        let result = f(&mut self.model.borrow_mut());
        let mut patches = self.model.borrow_mut().view_mut().drain();
        self.dispatch();
        patches.extend(self.model.borrow_mut().view_mut().drain());
        (result, patches)
    }

    fn log_last_diagnostic(&self) {
        if let Some(diagnostic) = self.model.borrow().diagnostics().last() {
            web_sys::console::error_1(&JsValue::from_str(&diagnostic.to_string()));
        }
    }

    /// Log the newest diagnostic if any were recorded past `before`
    fn log_new_diagnostic(&self, before: usize) {
        if self.model.borrow().diagnostics().len() > before {
            self.log_last_diagnostic();
        }
    }

    fn reject_busy(&self, kind: DiagnosticKind) {
        self.model.borrow_mut().report(kind, &GridError::Busy);
        self.log_last_diagnostic();
    }
}

/// Call every listener; a failing one does not stop the rest
fn call_each<L, E>(
    listeners: &[L],
    call: impl Fn(&L) -> Result<(), E>,
    describe: impl Fn(&E) -> String,
) -> Vec<ListenerFault> {
    listeners
        .iter()
        .filter_map(|listener| call(listener).err())
        .map(|err| ListenerFault::new(describe(&err)))
        .collect()
}

/// Crossword grid editor exposed to JavaScript.
///
/// Mutating methods return a JSON array of view patches for the page to
/// apply to its DOM.
#[wasm_bindgen]
pub struct GridEditor {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl GridEditor {
    /// Create an editor; `config` is optional JSON (`{"width":15,...}`)
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<GridEditor, JsValue> {
        let config = EditorConfig::from_json(config.as_deref().unwrap_or_default())
            .map_err(to_js_error)?;
        Ok(Self {
            shared: Rc::new(Shared::new(config)),
        })
    }

    /// Patches recorded since the last call, including those from async loads
    #[wasm_bindgen(js_name = takePatches)]
    pub fn take_patches(&self) -> String {
        let patches = self.shared.model.borrow_mut().view_mut().drain();
        patches_json(&patches)
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> usize {
        self.shared.model.borrow().width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> usize {
        self.shared.model.borrow().height()
    }

    #[wasm_bindgen(js_name = valueAt)]
    pub fn value_at(&self, row: usize, col: usize) -> String {
        self.shared.model.borrow().value_at(row, col)
    }

    #[wasm_bindgen(js_name = entryAt)]
    pub fn entry_at(&self, row: usize, col: usize) -> String {
        self.shared.model.borrow().entry_at(row, col).to_string()
    }

    /// Set a cell without notifying listeners
    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&self, row: usize, col: usize, value: &str) -> String {
        let (_, patches) = self.shared.with_model(|m| m.set_value(row, col, value));
        patches_json(&patches)
    }

    /// Content of a whole cell changed through typing
    #[wasm_bindgen]
    pub fn input(&self, row: usize, col: usize, text: &str) -> String {
        let (_, patches) = self.shared.with_model(|m| m.input(row, col, text));
        patches_json(&patches)
    }

    /// Content of one half (`"upper"` or `"lower"`) of a split cell changed
    #[wasm_bindgen(js_name = inputRegion)]
    pub fn input_region(
        &self,
        row: usize,
        col: usize,
        region: &str,
        text: &str,
    ) -> Result<String, JsValue> {
        let region = parse_region(region).ok_or_else(|| {
            to_js_error(GridError::InvalidArgument(format!(
                "unknown region {region:?}"
            )))
        })?;
        let (_, patches) = self
            .shared
            .with_model(|m| m.input_region(row, col, region, text));
        Ok(patches_json(&patches))
    }

    #[wasm_bindgen(js_name = focusCell)]
    pub fn focus_cell(&self, row: usize, col: usize, region: Option<String>) {
        let region = region.as_deref().and_then(parse_region);
        self.shared.model.borrow_mut().focus_cell(row, col, region);
    }

    /// Returns `{suppressDefault, patches}` as JSON
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> String {
        let modifiers = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        let (outcome, patches) = self
            .shared
            .with_model(|m| m.key_down(Key::from_dom(key), modifiers));
        let response = KeyResponse {
            suppress_default: outcome.suppress_default,
            patches,
        };
        serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&self, key: &str) -> String {
        let (_, patches) = self.shared.with_model(|m| m.key_up(Key::from_dom(key)));
        patches_json(&patches)
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, row: usize, col: usize, button: i16) -> String {
        let button = PointerButton::from_dom(button);
        let (_, patches) = self.shared.with_model(|m| m.pointer_down(row, col, button));
        patches_json(&patches)
    }

    #[wasm_bindgen(js_name = pointerEnter)]
    pub fn pointer_enter(&self, row: usize, col: usize) -> String {
        let (_, patches) = self.shared.with_model(|m| m.pointer_enter(row, col));
        patches_json(&patches)
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self, row: usize, col: usize, button: i16) -> String {
        let button = PointerButton::from_dom(button);
        let (_, patches) = self.shared.with_model(|m| m.pointer_up(row, col, button));
        patches_json(&patches)
    }

    /// Cells currently highlighted, as `[{row, col}, ...]`
    #[wasm_bindgen(js_name = highlighted)]
    pub fn highlighted(&self) -> String {
        let model = self.shared.model.borrow();
        let cells: &[CellPosition] = model.highlighted();
        serde_json::to_string(cells).unwrap_or_else(|_| "[]".to_string())
    }

    // =========================================================================
    // Structural operations
    // =========================================================================

    #[wasm_bindgen(js_name = addRow)]
    pub fn add_row(&self) -> String {
        patches_json(&self.shared.with_model(|m| m.add_row()).1)
    }

    #[wasm_bindgen(js_name = removeRow)]
    pub fn remove_row(&self) -> String {
        patches_json(&self.shared.with_model(|m| m.remove_row()).1)
    }

    #[wasm_bindgen(js_name = addColumn)]
    pub fn add_column(&self) -> String {
        patches_json(&self.shared.with_model(|m| m.add_column()).1)
    }

    #[wasm_bindgen(js_name = removeColumn)]
    pub fn remove_column(&self) -> String {
        patches_json(&self.shared.with_model(|m| m.remove_column()).1)
    }

    #[wasm_bindgen(js_name = shiftLeft)]
    pub fn shift_left(&self) -> String {
        patches_json(&self.shared.with_model(|m| m.shift_left()).1)
    }

    #[wasm_bindgen(js_name = shiftRight)]
    pub fn shift_right(&self) -> String {
        patches_json(&self.shared.with_model(|m| m.shift_right()).1)
    }

    #[wasm_bindgen(js_name = shiftUp)]
    pub fn shift_up(&self) -> String {
        patches_json(&self.shared.with_model(|m| m.shift_up()).1)
    }

    #[wasm_bindgen(js_name = shiftDown)]
    pub fn shift_down(&self) -> String {
        patches_json(&self.shared.with_model(|m| m.shift_down()).1)
    }

    #[wasm_bindgen]
    pub fn resize(&self, height: usize, width: usize) -> String {
        patches_json(&self.shared.with_model(|m| m.resize(height, width)).1)
    }

    #[wasm_bindgen]
    pub fn clear(&self) -> String {
        patches_json(&self.shared.with_model(|m| m.clear()).1)
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register a change listener; anything but a function is rejected
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: JsValue) -> Result<(), JsValue> {
        let listener = callable(callback, "onChange")?;
        self.shared.change_listeners.borrow_mut().push(listener);
        Ok(())
    }

    /// Register a listener receiving the word of each completed selection
    #[wasm_bindgen(js_name = onSelectionComplete)]
    pub fn on_selection_complete(&self, callback: JsValue) -> Result<(), JsValue> {
        let listener = callable(callback, "onSelectionComplete")?;
        self.shared.selection_listeners.borrow_mut().push(listener);
        Ok(())
    }

    // =========================================================================
    // Serialization and transfer
    // =========================================================================

    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.shared.model.borrow().to_json().map_err(to_js_error)
    }

    /// Replace the grid from a JSON document
    #[wasm_bindgen(js_name = loadJSON)]
    pub fn load_json(&self, json: &str) -> Result<String, JsValue> {
        let (result, patches) = self.shared.with_model(|m| m.load_json(json));
        result.map_err(to_js_error)?;
        Ok(patches_json(&patches))
    }

    /// GET a grid document; resolves to whether the grid was replaced.
    /// Call `takePatches` afterwards to redraw.
    #[wasm_bindgen]
    pub fn load(&self, url: String) -> Promise {
        let shared = Rc::clone(&self.shared);
        future_to_promise(async move {
            let Some(_guard) = TransferGuard::acquire(&shared.busy) else {
                shared.reject_busy(DiagnosticKind::Load);
                return Ok(JsValue::FALSE);
            };
            let response = FetchTransport.get(&url).await;
            // Patches stay recorded for takePatches
            let loaded = shared.apply(|m| m.apply_load_response(response));
            if !loaded {
                shared.log_last_diagnostic();
            }
            Ok(JsValue::from_bool(loaded))
        })
    }

    /// POST the grid; resolves to the server's acknowledgement, or null.
    /// The acknowledgement is also shown in an alert.
    #[wasm_bindgen]
    pub fn save(&self, url: String) -> Promise {
        let shared = Rc::clone(&self.shared);
        future_to_promise(async move {
            let Some(_guard) = TransferGuard::acquire(&shared.busy) else {
                shared.reject_busy(DiagnosticKind::Save);
                return Ok(JsValue::NULL);
            };
            let body = shared.model.borrow().to_json();
            let body = match body {
                Ok(body) => body,
                Err(err) => {
                    shared.model.borrow_mut().report(DiagnosticKind::Save, &err);
                    shared.log_last_diagnostic();
                    return Ok(JsValue::NULL);
                }
            };
            let response = FetchTransport.post_json(&url, body).await;
            let ack = shared.model.borrow_mut().apply_save_response(response);
            match ack {
                Some(ack) => {
                    if let Some(window) = web_sys::window() {
                        if let Err(err) = window.alert_with_message(&ack) {
                            web_sys::console::warn_1(&err);
                        }
                    }
                    Ok(JsValue::from_str(&ack))
                }
                None => {
                    shared.log_last_diagnostic();
                    Ok(JsValue::NULL)
                }
            }
        })
    }

    /// Resolves to the puzzle file names from the catalog endpoint
    #[wasm_bindgen(js_name = fetchCatalog)]
    pub fn fetch_catalog(&self) -> Promise {
        let shared = Rc::clone(&self.shared);
        future_to_promise(async move {
            let endpoint = shared.model.borrow().config().catalog_endpoint.clone();
            let before = shared.model.borrow().diagnostics().len();
            let response = FetchTransport.get(&endpoint).await;
            let files = shared.model.borrow_mut().apply_catalog_response(response);
            shared.log_new_diagnostic(before);
            serde_wasm_bindgen::to_value(&files).map_err(JsGridError::from_error)
        })
    }

    /// Diagnostics recorded so far, as JSON
    #[wasm_bindgen]
    pub fn diagnostics(&self) -> String {
        let model = self.shared.model.borrow();
        serde_json::to_string(model.diagnostics()).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(js_name = takeDiagnostics)]
    pub fn take_diagnostics(&self) -> String {
        let diagnostics = self.shared.model.borrow_mut().take_diagnostics();
        serde_json::to_string(&diagnostics).unwrap_or_else(|_| "[]".to_string())
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Font used for hint text in exported images
    #[wasm_bindgen(js_name = setExportFont)]
    pub fn set_export_font(&self, bytes: &[u8]) -> Result<(), JsValue> {
        let font = load_font(bytes).map_err(JsGridError::from_error)?;
        *self.shared.font.borrow_mut() = Some(font);
        Ok(())
    }

    /// Render the puzzle (without solution letters) to a PNG data URL.
    /// With `open`, the image is also shown in a new window.
    #[wasm_bindgen(js_name = exportImage)]
    pub fn export_image(&self, open: bool) -> Result<String, JsValue> {
        let (sheet, config) = {
            let model = self.shared.model.borrow();
            (model.export_sheet(), model.config().clone())
        };
        let font = self.shared.font.borrow();
        let mut options = RenderOptions::from_config(&config);
        if let Some(font) = font.as_ref() {
            options = options.with_font(font);
        }
        let png = render_png(&sheet, &options).map_err(JsGridError::from_error)?;
        let url = format!("data:image/png;base64,{}", STANDARD.encode(png));

        if open {
            show_in_new_window(&url)?;
        }
        Ok(url)
    }
}

fn callable(value: JsValue, method: &str) -> Result<Function, JsValue> {
    value.dyn_into::<Function>().map_err(|_| {
        to_js_error(GridError::InvalidArgument(format!(
            "{method} expects a function"
        )))
    })
}

fn show_in_new_window(url: &str) -> Result<(), JsValue> {
    let window =
        web_sys::window().ok_or_else(|| JsGridError::from_error("no window available"))?;
    let output = window
        .open_with_url_and_target("", "_blank")?
        .ok_or_else(|| JsGridError::from_error("the export window was blocked"))?;
    let body = output
        .document()
        .and_then(|document| document.body())
        .ok_or_else(|| JsGridError::from_error("the export window has no document"))?;
    body.set_inner_html(&format!(r#"<img src="{url}" alt="crossword">"#));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_region() {
        assert_eq!(parse_region("upper"), Some(Region::Upper));
        assert_eq!(parse_region("lower"), Some(Region::Lower));
        assert_eq!(parse_region("middle"), None);
    }

    #[test]
    fn test_transfer_guard_rejects_overlap() {
        let busy = Cell::new(false);
        let guard = TransferGuard::acquire(&busy);
        assert!(guard.is_some());
        assert!(TransferGuard::acquire(&busy).is_none());
        drop(guard);
        assert!(!busy.get());
        assert!(TransferGuard::acquire(&busy).is_some());
    }

    #[test]
    fn test_key_response_json() {
        let response = KeyResponse {
            suppress_default: true,
            patches: vec![ViewPatch::ClearHighlights],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "suppressDefault": true,
                "patches": [{ "op": "clearHighlights" }]
            })
        );
    }

    #[test]
    fn test_model_notifications_are_queued() {
        let shared = Shared::new(EditorConfig::default());
        shared.model.borrow_mut().input(0, 0, "A");
        assert_eq!(*shared.pending.borrow(), vec![Pending::Change]);

        let (_, patches) = shared.with_model(|m| m.add_row());
        assert!(shared.pending.borrow().is_empty());
        assert!(patches
            .iter()
            .any(|p| matches!(p, ViewPatch::Redraw { height: 11, width: 10 })));
        assert!(shared.model.borrow().view().patches().is_empty());
    }

    #[test]
    fn test_call_each_isolates_failures() {
        let calls = RefCell::new(Vec::new());
        let listeners = ["first", "broken", "last"];
        let faults = call_each(
            &listeners,
            |name| {
                calls.borrow_mut().push(*name);
                if *name == "broken" {
                    Err(format!("{name} threw"))
                } else {
                    Ok(())
                }
            },
            |err| err.clone(),
        );
        assert_eq!(*calls.borrow(), vec!["first", "broken", "last"]);
        assert_eq!(faults, vec![ListenerFault::new("broken threw")]);
    }

    #[test]
    fn test_patches_survive_pending_dispatch() {
        let shared = Shared::new(EditorConfig::default());
        shared.model.borrow_mut().view_mut().drain();

        let (_, patches) = shared.with_model(|m| m.input(0, 0, "A"));
        assert!(shared.pending.borrow().is_empty());
        assert!(patches
            .iter()
            .any(|p| matches!(p, ViewPatch::SetCell { row: 0, col: 0, .. })));
        assert!(shared.model.borrow().view().patches().is_empty());
    }

    #[test]
    fn test_selection_word_is_queued() {
        let shared = Shared::new(EditorConfig::default());
        {
            let mut model = shared.model.borrow_mut();
            model.set_value(0, 0, "O");
            model.set_value(0, 1, "K");
            model.pointer_down(0, 0, PointerButton::Primary);
            model.pointer_up(0, 1, PointerButton::Primary);
        }
        assert_eq!(
            *shared.pending.borrow(),
            vec![Pending::Selection("OK".to_string())]
        );
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn error_code(err: JsValue) -> String {
        js_sys::Reflect::get(&err, &JsValue::from_str("code"))
            .unwrap()
            .as_string()
            .unwrap()
    }

    fn counter(calls: &Rc<Cell<u32>>) -> Closure<dyn FnMut()> {
        let calls = Rc::clone(calls);
        Closure::<dyn FnMut()>::new(move || calls.set(calls.get() + 1))
    }

    #[wasm_bindgen_test]
    fn test_non_function_listener_is_rejected() {
        let editor = GridEditor::new(None).unwrap();
        let err = editor.on_change(JsValue::from_str("not a function")).unwrap_err();
        assert_eq!(error_code(err), "INVALID_ARGUMENT");
        let err = editor.on_selection_complete(JsValue::NULL).unwrap_err();
        assert_eq!(error_code(err), "INVALID_ARGUMENT");
        assert!(editor.shared.change_listeners.borrow().is_empty());
        assert!(editor.shared.selection_listeners.borrow().is_empty());
    }

    #[wasm_bindgen_test]
    fn test_throwing_listener_does_not_stop_others() {
        let editor = GridEditor::new(None).unwrap();
        let calls = Rc::new(Cell::new(0));
        let count = counter(&calls);
        editor
            .on_change(Function::new_no_args("throw new Error('listener broke')").into())
            .unwrap();
        editor.on_change(count.as_ref().clone()).unwrap();

        editor.input(0, 0, "A");
        assert_eq!(calls.get(), 1);
        assert!(editor.diagnostics().contains("listener broke"));
    }

    #[wasm_bindgen_test]
    fn test_selection_listener_receives_word() {
        let editor = GridEditor::new(None).unwrap();
        editor.set_value(0, 0, "O");
        editor.set_value(0, 1, "K");
        let record = Function::new_with_args("word", "globalThis.lastWord = word");
        editor.on_selection_complete(record.into()).unwrap();

        editor.pointer_down(0, 0, 0);
        editor.pointer_up(0, 1, 0);
        let word = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("lastWord"))
            .unwrap()
            .as_string();
        assert_eq!(word.as_deref(), Some("OK"));
    }

    #[wasm_bindgen_test]
    fn test_unknown_region_is_rejected() {
        let editor = GridEditor::new(None).unwrap();
        let err = editor.input_region(0, 0, "middle", "x").unwrap_err();
        assert_eq!(error_code(err), "INVALID_ARGUMENT");
    }

    #[wasm_bindgen_test]
    fn test_reentrant_listener_keeps_outer_patches() {
        let editor = GridEditor::new(None).unwrap();
        editor.take_patches();
        let inner = GridEditor {
            shared: Rc::clone(&editor.shared),
        };
        let drained = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&drained);
        let listener = Closure::<dyn FnMut()>::new(move || {
            *sink.borrow_mut() = inner.take_patches();
        });
        editor.on_change(listener.as_ref().clone()).unwrap();

        let patches: Vec<ViewPatch> = serde_json::from_str(&editor.input(0, 0, "A")).unwrap();
        assert!(patches
            .iter()
            .any(|p| matches!(p, ViewPatch::SetCell { row: 0, col: 0, .. })));
        assert_eq!(*drained.borrow(), "[]");
    }

    #[wasm_bindgen_test]
    async fn test_catalog_failure_resolves_empty() {
        let config = r#"{"catalogEndpoint": "http://127.0.0.1:9/puzzle-options"}"#;
        let editor = GridEditor::new(Some(config.to_string())).unwrap();
        let files = wasm_bindgen_futures::JsFuture::from(editor.fetch_catalog())
            .await
            .unwrap();
        assert_eq!(js_sys::Array::from(&files).length(), 0);
        let diagnostics = editor.take_diagnostics();
        assert!(diagnostics.contains(r#""kind":"Catalog""#));
    }

    #[wasm_bindgen_test]
    fn test_oversized_export_config_is_rejected() {
        let err = GridEditor::new(Some(r#"{"cellSize": 2000000000}"#.to_string()))
            .err()
            .unwrap();
        assert_eq!(error_code(err), "INVALID_ARGUMENT");
    }
}
