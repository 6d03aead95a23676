//! # query-to-pg
//!
//! Compiles MongoDB-style filter objects into parameterized PostgreSQL
//! clauses that can be appended to any base `SELECT`.
//!
//! ## Features
//!
//! - **Equality and comparisons**: `{age: 18}`, `{age: {$gte: 18, $lt: 65}}`,
//!   with `null` turning into `IS NULL` / `IS NOT NULL`
//! - **Disjunctions**: `$or` groups of single-field conditions
//! - **Sorting and pagination**: `$sort`, `$limit` (defaults to 10) and `$skip`
//! - **Table prefixes**: qualify columns with an alias per field
//! - **Query strings**: decode `age[$gte]=18&$limit=5` into a filter first
//! - **Schema validation**: check a filter against declared field types
//!
//! Every filter value is bound through a `$n` placeholder. Field names are
//! restricted to `[A-Za-z0-9_]+`, so nothing from the filter reaches the SQL
//! text unchecked.
//!
//! ## Quick Start
//!
//! ```rust
//! use query_to_pg::generate_sql_and_params;
//! use serde_json::json;
//!
//! let filter = json!({"age": {"$gte": 18}, "$sort": {"name": 1}, "$limit": 5});
//! let query = generate_sql_and_params("SELECT * FROM users", &filter, None).unwrap();
//!
//! assert_eq!(
//!     query.sql,
//!     "SELECT * FROM users WHERE age >= $1 ORDER BY name ASC LIMIT $2"
//! );
//! assert_eq!(query.values, vec![json!(18), json!(5)]);
//! ```
//!
//! ## Examples
//!
//! ### Disjunctions
//! ```rust
//! use query_to_pg::generate_sql_and_params;
//! use serde_json::json;
//!
//! let filter = json!({"$or": [{"status": "active"}, {"status": "pending"}]});
//! let query = generate_sql_and_params("SELECT * FROM users", &filter, None).unwrap();
//!
//! assert!(query.sql.contains("WHERE (status = $1 OR status = $2)"));
//! assert_eq!(query.values, vec![json!("active"), json!("pending"), json!(10)]);
//! ```
//!
//! ### Table prefixes
//! ```rust
//! use query_to_pg::{generate_sql_and_params, PrefixMap};
//! use serde_json::json;
//!
//! let prefixes = PrefixMap::new().with_prefix("age", "u").unwrap();
//! let query = generate_sql_and_params(
//!     "SELECT * FROM users u",
//!     &json!({"age": 18}),
//!     Some(&prefixes),
//! )
//! .unwrap();
//!
//! assert!(query.sql.contains("WHERE u.age = $1"));
//! ```
//!
//! ### Query strings
//! ```rust
//! use query_to_pg::query_string_to_sql;
//! use serde_json::json;
//!
//! let query = query_string_to_sql("SELECT * FROM users", "age[$gt]=30&$skip=20", None).unwrap();
//!
//! assert_eq!(query.sql, "SELECT * FROM users WHERE age > $1 LIMIT $2 OFFSET $3");
//! assert_eq!(query.values, vec![json!(30), json!(10), json!(20)]);
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod parser;
pub mod sql;
pub mod validator;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use ast::{
    Comparison, ComparisonOperator, Condition, Direction, DisjunctionEntry, Field, FilterEntry,
    FilterObject, Pagination, PrefixMap, Scalar, SortTerm,
};
pub use error::{CompileError, Error};
pub use parser::{parse_filter_object, parse_query_string, parse_sort};
pub use sql::{CompiledQuery, QueryBuilder};
pub use validator::{QuerySchema, ValidationIssue, ValidationReport};

use serde_json::Value;

/// Classifies a JSON filter object and compiles it onto `sql`.
///
/// # Arguments
///
/// * `sql` - The base statement, e.g. `SELECT * FROM users`
/// * `filter` - A filter object such as `{"age": {"$gte": 18}}`
/// * `prefix_map` - Optional field-to-alias map used to qualify columns
///
/// # Errors
///
/// Returns `Error::Compile` for a bad field name, an unknown operator, a
/// malformed `$or` entry, a bad sort field, or a filter of the wrong shape.
///
/// # Examples
///
/// ```
/// use query_to_pg::{generate_sql_and_params, CompileError, Error};
/// use serde_json::json;
///
/// let err = generate_sql_and_params("SELECT 1", &json!({"a-b": 1}), None).unwrap_err();
/// assert_eq!(err, Error::Compile(CompileError::InvalidFieldName("a-b".to_string())));
/// ```
pub fn generate_sql_and_params(
    sql: &str,
    filter: &Value,
    prefix_map: Option<&PrefixMap>,
) -> Result<CompiledQuery, Error> {
    let filter = parse_filter_object(filter).map_err(|e| {
        tracing::debug!(error = %e, "rejected filter");
        Error::Compile(e)
    })?;
    Ok(compile(sql, &filter, prefix_map))
}

/// Compiles an already classified filter. The typed AST carries every
/// invariant the JSON path checks, so this cannot fail.
///
/// # Examples
///
/// ```
/// use query_to_pg::{compile, Condition, Field, FilterObject};
/// use serde_json::json;
///
/// let filter = FilterObject::new()
///     .with_condition(Field::new("deleted_at").unwrap(), Condition::IsNull);
/// let query = compile("SELECT * FROM posts", &filter, None);
///
/// assert_eq!(query.sql, "SELECT * FROM posts WHERE deleted_at IS NULL LIMIT $1");
/// assert_eq!(query.values, vec![json!(10)]);
/// ```
pub fn compile(sql: &str, filter: &FilterObject, prefix_map: Option<&PrefixMap>) -> CompiledQuery {
    let builder = match prefix_map {
        Some(prefixes) => QueryBuilder::new().with_prefix_map(prefixes),
        None => QueryBuilder::new(),
    };
    builder.build(sql, filter)
}

/// Decodes a URL query string into a filter object and compiles it.
///
/// A leading `?` is ignored. Decoding never fails; see [`parse_query_string`]
/// for the rules. Errors come only from compiling the decoded filter.
///
/// # Examples
///
/// ```
/// use query_to_pg::query_string_to_sql;
/// use serde_json::json;
///
/// let query = query_string_to_sql(
///     "SELECT * FROM users",
///     "?$or[0][role]=admin&$or[1][role]=owner&$sort[created_at]=-1",
///     None,
/// )
/// .unwrap();
///
/// assert_eq!(
///     query.sql,
///     "SELECT * FROM users WHERE (role = $1 OR role = $2) ORDER BY created_at DESC LIMIT $3"
/// );
/// assert_eq!(query.values, vec![json!("admin"), json!("owner"), json!(10)]);
/// ```
pub fn query_string_to_sql(
    sql: &str,
    query_string: &str,
    prefix_map: Option<&PrefixMap>,
) -> Result<CompiledQuery, Error> {
    let filter = parse_query_string(query_string);
    generate_sql_and_params(sql, &filter, prefix_map)
}
