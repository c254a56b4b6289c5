//! Runtime Configuration
//!
//! The page may define `window.__STAN_BINGO__` with any `BingoConfig`
//! fields; connection coordinates missing there come from the build
//! environment (`STAN_BINGO_URL`, `STAN_BINGO_ANON_KEY`).

use bingo_core::{BingoConfig, BingoError, BingoResult};
use wasm_bindgen::JsValue;

const GLOBAL_CONFIG: &str = "__STAN_BINGO__";

pub fn load_config() -> BingoResult<BingoConfig> {
    let config = read_global()?.unwrap_or_default();
    Ok(config.with_fallback_connection(option_env!("STAN_BINGO_URL"), option_env!("STAN_BINGO_ANON_KEY")))
}

fn read_global() -> BingoResult<Option<BingoConfig>> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(GLOBAL_CONFIG))
        .map_err(|e| BingoError::Config(format!("{:?}", e)))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| BingoError::Config(format!("{}: {}", GLOBAL_CONFIG, e)))
}
