//! WebAssembly bindings for Railyard
//!
//! Browser-facing wrappers around the facade functions. Errors are returned
//! to JavaScript as exceptions instead of panicking.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::core::{CharacterSet, Theme};

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

#[cfg(target_arch = "wasm32")]
fn character_set(style: &str) -> Result<CharacterSet, JsValue> {
    match style {
        "ascii" => Ok(CharacterSet::Ascii),
        "unicode" => Ok(CharacterSet::Unicode),
        _ => Err(JsValue::from_str(&format!(
            "Unknown style: {}. Use 'ascii' or 'unicode'",
            style
        ))),
    }
}

/// Render a pattern as a standalone SVG document
///
/// # Arguments
/// * `input` - Pattern text, optionally as `/pattern/flags`
/// * `theme` - "light", "dark", or "none" for an unstyled document
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn render_svg(input: &str, theme: &str) -> Result<String, JsValue> {
    let theme = match theme {
        "none" => None,
        name => Some(name.parse::<Theme>().map_err(|e| JsValue::from_str(&e))?),
    };
    Ok(crate::render_regex_svg(input, theme))
}

/// Render a pattern as character art
///
/// # Arguments
/// * `input` - Pattern text
/// * `style` - Character set style ("ascii" or "unicode")
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn render_text(input: &str, style: &str) -> Result<String, JsValue> {
    let style = character_set(style)?;
    Ok(crate::render_text(input, style))
}

/// Parse a pattern and return the tree and anomalies as JSON
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn parse_json(input: &str) -> Result<String, JsValue> {
    let outcome = crate::parse_with_diagnostics(input);
    serde_json::to_string(&outcome).map_err(|e| JsValue::from_str(&format!("{}", e)))
}
