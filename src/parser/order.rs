use crate::ast::{Direction, Field, SortTerm};
use crate::error::CompileError;
use serde_json::Value;

/// Parses the value of a `$sort` directive into sort terms, in document order.
///
/// `null` and `{}` both mean "no ordering". Every key must be a valid
/// identifier; the direction is `ASC` only for numeric `1`.
///
/// # Examples
///
/// ```
/// use query_to_pg::{parse_sort, Direction};
/// use serde_json::json;
///
/// let terms = parse_sort(&json!({"name": 1, "created_at": -1})).unwrap();
/// assert_eq!(terms.len(), 2);
/// assert_eq!(terms[0].direction, Direction::Asc);
/// assert_eq!(terms[1].direction, Direction::Desc);
/// ```
///
/// # Errors
///
/// Returns `CompileError::InvalidSortField` for a key that is not an identifier
/// and `CompileError::InvalidSort` when the value is not an object.
pub fn parse_sort(value: &Value) -> Result<Vec<SortTerm>, CompileError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => map
            .iter()
            .map(|(name, direction)| parse_sort_term(name, direction))
            .collect(),
        _ => Err(CompileError::InvalidSort),
    }
}

pub fn parse_sort_term(name: &str, direction: &Value) -> Result<SortTerm, CompileError> {
    let field =
        Field::new(name).map_err(|_| CompileError::InvalidSortField(name.to_string()))?;
    Ok(SortTerm::new(field).with_direction(Direction::from_value(direction)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_sort_preserves_order() {
        let terms = parse_sort(&json!({"b": 1, "a": -1})).unwrap();
        let names: Vec<&str> = terms.iter().map(|t| t.field.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_parse_sort_null_and_empty() {
        assert!(parse_sort(&json!(null)).unwrap().is_empty());
        assert!(parse_sort(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_parse_sort_invalid_field() {
        let result = parse_sort(&json!({"name desc": 1}));
        assert_eq!(
            result,
            Err(CompileError::InvalidSortField("name desc".to_string()))
        );
    }

    #[test]
    fn test_parse_sort_not_an_object() {
        assert_eq!(parse_sort(&json!("name")), Err(CompileError::InvalidSort));
        assert_eq!(parse_sort(&json!([1])), Err(CompileError::InvalidSort));
    }

    #[test]
    fn test_parse_sort_term_direction() {
        let term = parse_sort_term("age", &json!(2)).unwrap();
        assert_eq!(term.direction, Direction::Desc);
    }
}
