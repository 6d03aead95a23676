//! WASM bindings for TypeScript/JavaScript usage.
//!
//! Filters, prefix maps and field declarations cross the boundary as JSON
//! text; results come back as plain JavaScript objects.
//!
//! ## Usage from TypeScript
//!
//! ```typescript
//! import init, { generateSqlAndParams, queryStringToSql } from './pkg/query_to_pg.js';
//!
//! await init();
//!
//! const result = generateSqlAndParams(
//!   "SELECT * FROM users u",
//!   JSON.stringify({ age: { $gte: 18 }, $sort: { name: 1 } }),
//!   JSON.stringify({ age: "u" })
//! );
//!
//! console.log('SQL:', result.sql);       // SELECT * FROM users u WHERE u.age >= $1 ORDER BY name ASC LIMIT $2
//! console.log('Values:', result.values); // [18, 10]
//! ```

use crate::{CompiledQuery, PrefixMap, QuerySchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// Initialize WASM module (call this first from JavaScript)
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Compiled clause and bind values, designed for TypeScript consumption.
#[wasm_bindgen]
#[derive(Serialize, Deserialize)]
pub struct WasmCompiledQuery {
    /// Base statement followed by the generated clauses
    sql: String,
    /// Bind values for $1, $2, ...
    values: Vec<Value>,
}

#[wasm_bindgen]
impl WasmCompiledQuery {
    #[wasm_bindgen(getter)]
    pub fn sql(&self) -> String {
        self.sql.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn values(&self) -> JsValue {
        to_js(&self.values).unwrap_or(JsValue::NULL)
    }

    /// Get the entire result as a JSON object
    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> JsValue {
        to_js(self).unwrap_or(JsValue::NULL)
    }
}

impl From<CompiledQuery> for WasmCompiledQuery {
    fn from(query: CompiledQuery) -> Self {
        Self {
            sql: query.sql,
            values: query.values,
        }
    }
}

/// Compile a JSON filter object onto a base statement.
///
/// # Arguments
///
/// * `sql` - The base statement
/// * `filter` - The filter object as JSON text
/// * `prefix_map` - Optional field-to-alias map as JSON text, e.g. `'{"age":"u"}'`
///
/// # Example (TypeScript)
///
/// ```typescript
/// const result = generateSqlAndParams("SELECT * FROM users", '{"status":"active"}');
/// console.log(result.sql);    // SELECT * FROM users WHERE status = $1 LIMIT $2
/// console.log(result.values); // ["active", 10]
/// ```
#[wasm_bindgen(js_name = generateSqlAndParams)]
pub fn generate_sql_and_params_wasm(
    sql: &str,
    filter: &str,
    prefix_map: Option<String>,
) -> Result<WasmCompiledQuery, JsValue> {
    let filter: Value = serde_json::from_str(filter)
        .map_err(|e| JsValue::from_str(&format!("Invalid filter JSON: {}", e)))?;
    let prefixes = parse_prefix_map(prefix_map.as_deref())?;

    crate::generate_sql_and_params(sql, &filter, prefixes.as_ref())
        .map(WasmCompiledQuery::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode a URL query string into a filter object without compiling it.
#[wasm_bindgen(js_name = parseQueryString)]
pub fn parse_query_string_wasm(query_string: &str) -> Result<JsValue, JsValue> {
    let filter = crate::parse_query_string(query_string);

    to_js(&filter).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Decode a URL query string and compile it onto a base statement.
#[wasm_bindgen(js_name = queryStringToSql)]
pub fn query_string_to_sql_wasm(
    sql: &str,
    query_string: &str,
    prefix_map: Option<String>,
) -> Result<WasmCompiledQuery, JsValue> {
    let prefixes = parse_prefix_map(prefix_map.as_deref())?;

    crate::query_string_to_sql(sql, query_string, prefixes.as_ref())
        .map(WasmCompiledQuery::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Validate a filter object against declared fields.
///
/// # Arguments
///
/// * `fields` - Field declarations as JSON text, e.g. `'{"age":{"type":"integer"}}'`
/// * `filter` - The filter object as JSON text
///
/// # Returns
///
/// Returns `{ valid, errors: [{ path, message }] }`.
#[wasm_bindgen(js_name = validateFilter)]
pub fn validate_filter_wasm(fields: &str, filter: &str) -> Result<JsValue, JsValue> {
    let schema: QuerySchema = serde_json::from_str(fields)
        .map_err(|e| JsValue::from_str(&format!("Invalid fields JSON: {}", e)))?;
    let filter: Value = serde_json::from_str(filter)
        .map_err(|e| JsValue::from_str(&format!("Invalid filter JSON: {}", e)))?;

    to_js(&schema.validate(&filter))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_prefix_map(prefix_map: Option<&str>) -> Result<Option<PrefixMap>, JsValue> {
    prefix_map
        .map(|json| {
            serde_json::from_str(json)
                .map_err(|e| JsValue::from_str(&format!("Invalid prefix map JSON: {}", e)))
        })
        .transpose()
}

/// Objects become plain JS objects rather than `Map`s.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}
