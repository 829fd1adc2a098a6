//! WASM bindings for Numlab Core.
//!
//! Problems and results cross the boundary as JSON strings.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { solve_problem } from 'numlab_core';
//!
//! await init();
//!
//! const result = JSON.parse(solve_problem(JSON.stringify({
//!   method: 'newton',
//!   formula: 'x^3 - 2*x - 5',
//!   x0: 2,
//! })));
//! console.log(result.root, result.converged);
//! ```

use wasm_bindgen::prelude::*;

use crate::error::NumlabError;
use crate::problem::Problem;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(error: NumlabError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Solve a JSON problem and return the JSON result.
///
/// Throws the error message when the problem is malformed or a precondition
/// fails. Non-convergence and mid-iteration failures are part of the result.
#[wasm_bindgen]
pub fn solve_problem(problem_json: &str) -> Result<String, JsValue> {
    let outcome = Problem::from_json(problem_json)
        .and_then(|problem| problem.solve())
        .map_err(to_js)?;
    serde_json::to_string(&outcome).map_err(|e| to_js(e.into()))
}

/// Solve a JSON problem and return the full record for storage.
#[wasm_bindgen]
pub fn solve_record(problem_json: &str, title: Option<String>) -> Result<String, JsValue> {
    let record = Problem::from_json(problem_json)
        .and_then(|problem| problem.into_record(title.as_deref()))
        .map_err(to_js)?;
    serde_json::to_string(&record).map_err(|e| to_js(e.into()))
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
