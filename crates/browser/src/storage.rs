//! Local storage and `document.cookie` back-ends

use cookie::Cookie;
use sc_login_core::{CookieOptions, CookieStore, CoreError, CoreResult, DurableStore};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, Storage};

/// `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

fn local_storage() -> CoreResult<Storage> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or_else(|| CoreError::storage("local storage is not available"))
}

impl DurableStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        local_storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| CoreError::storage(format!("failed to write {key}: {}", js_error(&e))))
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        local_storage()?
            .remove_item(key)
            .map_err(|e| CoreError::storage(format!("failed to remove {key}: {}", js_error(&e))))
    }
}

/// Cookies of the current document
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookieStore;

fn html_document() -> CoreResult<HtmlDocument> {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.dyn_into::<HtmlDocument>().ok())
        .ok_or_else(|| CoreError::storage("no HTML document to hold cookies"))
}

fn write_cookie(cookie: Cookie<'_>) -> CoreResult<()> {
    html_document()?
        .set_cookie(&cookie.encoded().to_string())
        .map_err(|e| CoreError::storage(format!("failed to set cookie: {}", js_error(&e))))
}

impl CookieStore for DocumentCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        let cookies = html_document().ok()?.cookie().ok()?;
        Cookie::split_parse_encoded(cookies)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value().to_string())
    }

    fn put(&self, name: &str, value: &str, options: &CookieOptions) -> CoreResult<()> {
        let max_age = i64::try_from(options.max_age.as_secs()).unwrap_or(i64::MAX);
        write_cookie(build_cookie(name, value, options, time::Duration::seconds(max_age)))
    }

    fn remove(&self, name: &str, options: &CookieOptions) -> CoreResult<()> {
        write_cookie(build_cookie(name, "", options, time::Duration::ZERO))
    }
}

/// Cookie shared across the domain; an empty domain yields a host-only cookie.
/// Name and value are percent-encoded when written.
fn build_cookie<'c>(
    name: &'c str,
    value: &'c str,
    options: &'c CookieOptions,
    max_age: time::Duration,
) -> Cookie<'c> {
    let mut builder = Cookie::build((name, value))
        .path("/")
        .secure(options.secure)
        .max_age(max_age);
    if !options.domain.is_empty() {
        builder = builder.domain(options.domain.as_str());
    }
    builder.build()
}

fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
