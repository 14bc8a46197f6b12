use crossgrid_core::{TransferResponse, Transport, TransportError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// Transport over the browser `fetch` API
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

fn js_error(value: JsValue) -> TransportError {
    TransportError::new(describe(&value))
}

/// Best-effort text for a thrown JS value
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

async fn send(url: &str, init: &RequestInit) -> Result<TransferResponse, TransportError> {
    let window = web_sys::window().ok_or_else(|| TransportError::new("no window available"))?;
    let request = Request::new_with_str_and_init(url, init).map_err(js_error)?;
    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let response: Response = value.dyn_into().map_err(js_error)?;
    let status = response.status();
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    Ok(TransferResponse::new(status, text.as_string().unwrap_or_default()))
}

impl Transport for FetchTransport {
    async fn get(&self, url: &str) -> Result<TransferResponse, TransportError> {
        let init = RequestInit::new();
        init.set_method("GET");
        send(url, &init).await
    }

    async fn post_json(&self, url: &str, body: String) -> Result<TransferResponse, TransportError> {
        let headers = Headers::new().map_err(js_error)?;
        headers
            .set("Content-Type", "application/json")
            .map_err(js_error)?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&body));
        send(url, &init).await
    }
}
