mod api;
mod transport;

pub use api::GridEditor;
pub use transport::FetchTransport;

use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}
