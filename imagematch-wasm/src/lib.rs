//! WebAssembly bindings for the ImageMatch search session.
//!
//! The page uploads with `fetch` and then hands the reply to these functions.
//! The session is kept in `localStorage` (image) and `sessionStorage` (reply)
//! so it survives the navigation from `/` to `/search`.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Storage;

use imagematch_core::{
    validate, DataUri, HandoffStore, ImageMatchError, KeyValueStore, RedirectReason, ResultsView,
    Route, SearchResponse, Selection, SortKey, Theme, ThemeContext, UploadCandidate, ViewState,
};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// `window.localStorage` / `window.sessionStorage` as a handoff backend.
struct WebStorage(Storage);

impl KeyValueStore for WebStorage {
    fn get(&self, key: &str) -> imagematch_core::Result<Option<String>> {
        self.0.get_item(key).map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> imagematch_core::Result<()> {
        self.0.set_item(key, value).map_err(storage_error)
    }

    fn remove(&self, key: &str) -> imagematch_core::Result<()> {
        self.0.remove_item(key).map_err(storage_error)
    }
}

fn storage_error(value: JsValue) -> ImageMatchError {
    let detail = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    ImageMatchError::Storage(detail)
}

fn browser_store() -> Result<HandoffStore<WebStorage, WebStorage>, ImageMatchError> {
    let window = web_sys::window()
        .ok_or_else(|| ImageMatchError::Storage("no window object".to_string()))?;
    let local = window
        .local_storage()
        .map_err(storage_error)?
        .ok_or_else(|| ImageMatchError::Storage("localStorage unavailable".to_string()))?;
    let session = window
        .session_storage()
        .map_err(storage_error)?
        .ok_or_else(|| ImageMatchError::Storage("sessionStorage unavailable".to_string()))?;
    Ok(HandoffStore::new(WebStorage(local), WebStorage(session)))
}

/// Outcome of an action, serialized for JavaScript.
#[derive(Serialize)]
struct ActionResult {
    ok: bool,
    /// Route to navigate to, if any
    route: Option<&'static str>,
    /// Machine-readable error
    error: Option<String>,
    /// Text to show the user
    message: Option<String>,
}

impl ActionResult {
    fn ok(route: Option<Route>) -> Self {
        Self {
            ok: true,
            route: route.map(Route::path),
            error: None,
            message: None,
        }
    }

    fn failed(err: &ImageMatchError) -> Self {
        Self {
            ok: false,
            route: None,
            error: Some(err.to_string()),
            message: Some(err.user_message()),
        }
    }

    fn from_result(result: Result<Option<Route>, ImageMatchError>) -> Self {
        match result {
            Ok(route) => Self::ok(route),
            Err(e) => Self::failed(&e),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        format!(r#"{{"ok":false,"error":"Serialization error: {}"}}"#, e)
    })
}

/// Check a selected or dropped file before uploading it.
///
/// # Returns
/// `{"ok": true}` or `{"ok": false, "error": ..., "message": ...}`
#[wasm_bindgen]
pub fn validate_upload(size_bytes: f64, declared_mime: &str) -> String {
    let mut candidate = UploadCandidate::new(Vec::new(), declared_mime);
    candidate.size_bytes = size_bytes.max(0.0) as u64;
    to_json(&ActionResult::from_result(validate(candidate).map(|_| None)))
}

/// Store the uploaded file and the service reply, then route to `/search`.
///
/// # Arguments
/// * `file_bytes` - The uploaded file content
/// * `declared_mime` - `File.type` as reported by the browser
/// * `response_json` - Raw body of the `POST /api/search` reply
#[wasm_bindgen]
pub fn store_search_session(file_bytes: &[u8], declared_mime: &str, response_json: &str) -> String {
    let result = (|| -> Result<Option<Route>, ImageMatchError> {
        let accepted = validate(UploadCandidate::new(file_bytes.to_vec(), declared_mime))?;
        let response = SearchResponse::from_json(response_json)?;
        let image = DataUri::encode(accepted.mime_type(), accepted.bytes());
        browser_store()?.write_session(&image, &response)?;
        Ok(Some(Route::Results))
    })();
    to_json(&ActionResult::from_result(result))
}

/// Mount the results view from browser storage and render it.
///
/// # Returns
/// The results page as JSON, or `{"redirect": "/", "reason": ...}` when there
/// is no usable session.
#[wasm_bindgen]
pub fn load_results_page(category: &str, sort: &str, theme: &str) -> String {
    let store = match browser_store() {
        Ok(store) => store,
        Err(e) => return to_json(&ActionResult::failed(&e)),
    };
    let theme = ThemeContext::new(theme.parse().unwrap_or_default());

    let mut view = ResultsView::open(&store);
    if let ViewState::Redirected(reason) = view.state() {
        return redirect_json(reason);
    }

    view.set_category(category);
    view.set_sort(sort.parse().unwrap_or_default());
    match view.render(&theme) {
        Some(page) => to_json(&page),
        None => redirect_json(&RedirectReason::NoActiveSession),
    }
}

fn redirect_json(reason: &RedirectReason) -> String {
    let reason = match reason {
        RedirectReason::NoActiveSession => "no_active_session".to_string(),
        RedirectReason::MalformedSession(detail) => format!("malformed_session: {detail}"),
        RedirectReason::NewSearch => "new_search".to_string(),
    };
    serde_json::json!({ "redirect": Route::Submission.path(), "reason": reason }).to_string()
}

/// Clear both storage slots and route back to `/`.
#[wasm_bindgen]
pub fn clear_search_session() -> String {
    let result = browser_store()
        .and_then(|store| ResultsView::new().new_search(&store))
        .map(Some);
    to_json(&ActionResult::from_result(result))
}

/// Filter and sort a reply without touching storage.
///
/// # Returns
/// The projected result list as JSON, or an error object.
#[wasm_bindgen]
pub fn project_results(response_json: &str, category: &str, sort: &str) -> String {
    let sort: SortKey = sort.parse().unwrap_or_default();
    match SearchResponse::from_json(response_json) {
        Ok(response) => to_json(&imagematch_core::project(
            &response.results,
            &Selection::new(category, sort),
        )),
        Err(e) => to_json(&ActionResult::failed(&e)),
    }
}

/// Filter panel options, `"all"` first, as a JSON array.
#[wasm_bindgen]
pub fn category_options() -> String {
    to_json(&imagematch_core::category_options())
}

/// The other theme: `"dark"` ↔ `"light"`.
#[wasm_bindgen]
pub fn toggle_theme(theme: &str) -> String {
    let mut ctx = ThemeContext::new(theme.parse::<Theme>().unwrap_or_default());
    ctx.toggle().to_string()
}

/// Palette colours for a theme, as JSON.
#[wasm_bindgen]
pub fn theme_palette(theme: &str) -> String {
    to_json(&theme.parse::<Theme>().unwrap_or_default().palette())
}

/// Get the library version.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
