use super::order::parse_sort;
use crate::ast::{
    Comparison, ComparisonOperator, Condition, DisjunctionEntry, Field, FilterEntry,
    FilterObject, Pagination, Scalar,
};
use crate::config::{is_pagination_key, LIMIT_KEY, OR_KEY, SKIP_KEY, SORT_KEY};
use crate::error::CompileError;
use serde_json::{Map, Value};

/// How a top-level key of a filter object is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// `$limit`, `$skip` or `$sort`.
    Pagination,
    /// `$or`.
    Disjunction,
    /// Anything else, which must name a column.
    Field,
}

pub fn classify_key(key: &str) -> KeyKind {
    if is_pagination_key(key) {
        KeyKind::Pagination
    } else if key == OR_KEY {
        KeyKind::Disjunction
    } else {
        KeyKind::Field
    }
}

/// Classifies a raw filter object into the typed [`FilterObject`].
///
/// Keys are visited once, in document order. Field keys and `$or` become
/// [`FilterEntry`] values in that order; the pagination directives are read
/// after all conditions, so a bad condition is reported before a bad `$sort`.
///
/// # Examples
///
/// ```
/// use query_to_pg::{parse_filter_object, FilterEntry};
/// use serde_json::json;
///
/// let filter = parse_filter_object(&json!({
///     "age": {"$gte": 18},
///     "$or": [{"status": "active"}, {"status": null}],
///     "$limit": 5
/// }))
/// .unwrap();
///
/// assert_eq!(filter.entries.len(), 2);
/// assert!(matches!(filter.entries[1], FilterEntry::Or(ref group) if group.len() == 2));
/// ```
///
/// # Errors
///
/// - `InvalidFieldName` for a non-reserved key that is not an identifier,
///   including the key of an `$or` entry
/// - `InvalidOperator` for an unknown directive inside a comparison object
/// - `InvalidDisjunctionEntry` for an `$or` element without exactly one key
/// - `InvalidSortField` for a `$sort` key that is not an identifier
/// - shape errors for arrays or objects where a scalar is required
pub fn parse_filter_object(value: &Value) -> Result<FilterObject, CompileError> {
    let object = value.as_object().ok_or(CompileError::NotAnObject)?;
    let mut filter = FilterObject::new();

    for (key, value) in object {
        match classify_key(key) {
            KeyKind::Pagination => continue,
            KeyKind::Disjunction => {
                if let Some(group) = parse_disjunction(value)? {
                    filter.entries.push(FilterEntry::Or(group));
                }
            }
            KeyKind::Field => {
                let field = Field::new(key.as_str())?;
                let condition = parse_condition(&field, value)?;
                filter.entries.push(FilterEntry::Field { field, condition });
            }
        }
    }

    filter.pagination = parse_pagination(object)?;
    Ok(filter)
}

/// Classifies the value of one field into a [`Condition`].
pub fn parse_condition(field: &Field, value: &Value) -> Result<Condition, CompileError> {
    match value {
        Value::Null => Ok(Condition::IsNull),
        Value::Object(directives) => parse_comparisons(field, directives).map(Condition::Compare),
        Value::Array(_) => Err(CompileError::InvalidFieldValue(field.to_string())),
        scalar => Scalar::from_json(scalar)
            .map(Condition::Equals)
            .ok_or_else(|| CompileError::InvalidFieldValue(field.to_string())),
    }
}

fn parse_comparisons(
    field: &Field,
    directives: &Map<String, Value>,
) -> Result<Vec<Comparison>, CompileError> {
    directives
        .iter()
        .map(|(directive, value)| {
            let operator = ComparisonOperator::from_directive(directive)
                .ok_or_else(|| CompileError::InvalidOperator(directive.clone()))?;
            let value = Scalar::from_json(value)
                .ok_or_else(|| CompileError::InvalidFieldValue(field.to_string()))?;
            Ok(Comparison { operator, value })
        })
        .collect()
}

/// Parses the value of `$or`. `null` is treated as an absent group.
pub fn parse_disjunction(value: &Value) -> Result<Option<Vec<DisjunctionEntry>>, CompileError> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_disjunction_entry(index, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        _ => Err(CompileError::InvalidDisjunction),
    }
}

fn parse_disjunction_entry(index: usize, item: &Value) -> Result<DisjunctionEntry, CompileError> {
    let entry = item
        .as_object()
        .ok_or(CompileError::InvalidDisjunctionEntry(index))?;

    let mut pairs = entry.iter();
    match (pairs.next(), pairs.next()) {
        (Some((key, value)), None) => {
            let field = Field::new(key.as_str())?;
            let condition = parse_condition(&field, value)?;
            Ok(DisjunctionEntry::new(field, condition))
        }
        _ => Err(CompileError::InvalidDisjunctionEntry(index)),
    }
}

fn parse_pagination(object: &Map<String, Value>) -> Result<Pagination, CompileError> {
    let limit = object
        .get(LIMIT_KEY)
        .map(|value| parse_bound(LIMIT_KEY, value))
        .transpose()?;
    let skip = object
        .get(SKIP_KEY)
        .map(|value| parse_bound(SKIP_KEY, value))
        .transpose()?;
    let sort = match object.get(SORT_KEY) {
        Some(value) => parse_sort(value)?,
        None => Vec::new(),
    };

    Ok(Pagination { limit, skip, sort })
}

fn parse_bound(key: &str, value: &Value) -> Result<Scalar, CompileError> {
    Scalar::from_json(value).ok_or_else(|| CompileError::InvalidPagination(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Direction;
    use serde_json::json;

    #[test]
    fn test_classify_key() {
        assert_eq!(classify_key("$limit"), KeyKind::Pagination);
        assert_eq!(classify_key("$skip"), KeyKind::Pagination);
        assert_eq!(classify_key("$sort"), KeyKind::Pagination);
        assert_eq!(classify_key("$or"), KeyKind::Disjunction);
        assert_eq!(classify_key("age"), KeyKind::Field);
        assert_eq!(classify_key("$and"), KeyKind::Field);
    }

    #[test]
    fn test_parse_scalar_and_null() {
        let filter = parse_filter_object(&json!({"name": "bob", "deleted_at": null})).unwrap();
        assert_eq!(filter.entries.len(), 2);
        match &filter.entries[0] {
            FilterEntry::Field { field, condition } => {
                assert_eq!(field.name(), "name");
                assert_eq!(condition, &Condition::Equals(Scalar::from("bob")));
            }
            other => panic!("Expected field entry, got {:?}", other),
        }
        assert!(matches!(
            filter.entries[1],
            FilterEntry::Field { condition: Condition::IsNull, .. }
        ));
    }

    #[test]
    fn test_parse_comparison_object() {
        let filter = parse_filter_object(&json!({"age": {"$gte": 18, "$lt": 65}})).unwrap();
        match &filter.entries[0] {
            FilterEntry::Field {
                condition: Condition::Compare(comparisons),
                ..
            } => {
                assert_eq!(comparisons.len(), 2);
                assert_eq!(comparisons[0].operator, ComparisonOperator::Gte);
                assert_eq!(comparisons[1].operator, ComparisonOperator::Lt);
            }
            other => panic!("Expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_operator() {
        let result = parse_filter_object(&json!({"age": {"$foo": 1}}));
        assert_eq!(result, Err(CompileError::InvalidOperator("$foo".to_string())));
    }

    #[test]
    fn test_parse_invalid_field_name() {
        let result = parse_filter_object(&json!({"age OR 1=1": 1}));
        assert_eq!(
            result,
            Err(CompileError::InvalidFieldName("age OR 1=1".to_string()))
        );
    }

    #[test]
    fn test_field_name_checked_before_operator() {
        let result = parse_filter_object(&json!({"bad-name": {"$foo": 1}}));
        assert!(matches!(result, Err(CompileError::InvalidFieldName(_))));
    }

    #[test]
    fn test_parse_array_value_rejected() {
        let result = parse_filter_object(&json!({"tags": [1, 2]}));
        assert_eq!(result, Err(CompileError::InvalidFieldValue("tags".to_string())));
    }

    #[test]
    fn test_parse_nested_comparison_value_rejected() {
        let result = parse_filter_object(&json!({"age": {"$gt": {"x": 1}}}));
        assert_eq!(result, Err(CompileError::InvalidFieldValue("age".to_string())));
    }

    #[test]
    fn test_parse_not_an_object() {
        assert_eq!(parse_filter_object(&json!([1])), Err(CompileError::NotAnObject));
    }

    #[test]
    fn test_parse_disjunction() {
        let filter =
            parse_filter_object(&json!({"$or": [{"status": "a"}, {"age": {"$gt": 1}}]})).unwrap();
        match &filter.entries[0] {
            FilterEntry::Or(group) => {
                assert_eq!(group.len(), 2);
                assert_eq!(group[0].field.name(), "status");
                assert!(matches!(group[1].condition, Condition::Compare(_)));
            }
            other => panic!("Expected disjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_disjunction_entry_key_count() {
        let empty = parse_filter_object(&json!({"$or": [{"a": 1}, {}]}));
        assert_eq!(empty, Err(CompileError::InvalidDisjunctionEntry(1)));

        let double = parse_filter_object(&json!({"$or": [{"a": 1, "b": 2}]}));
        assert_eq!(double, Err(CompileError::InvalidDisjunctionEntry(0)));

        let scalar = parse_filter_object(&json!({"$or": ["a"]}));
        assert_eq!(scalar, Err(CompileError::InvalidDisjunctionEntry(0)));
    }

    #[test]
    fn test_parse_disjunction_validates_fields_and_operators() {
        let bad_field = parse_filter_object(&json!({"$or": [{"a.b": 1}]}));
        assert_eq!(bad_field, Err(CompileError::InvalidFieldName("a.b".to_string())));

        let bad_op = parse_filter_object(&json!({"$or": [{"a": {"$in": [1]}}]}));
        assert_eq!(bad_op, Err(CompileError::InvalidOperator("$in".to_string())));
    }

    #[test]
    fn test_parse_disjunction_shape() {
        assert_eq!(
            parse_filter_object(&json!({"$or": {"a": 1}})),
            Err(CompileError::InvalidDisjunction)
        );
        let null_group = parse_filter_object(&json!({"$or": null})).unwrap();
        assert!(null_group.entries.is_empty());
    }

    #[test]
    fn test_parse_pagination() {
        let filter = parse_filter_object(&json!({
            "$sort": {"name": 1, "age": -1},
            "$limit": 0,
            "$skip": 20
        }))
        .unwrap();

        assert!(filter.entries.is_empty());
        assert_eq!(filter.pagination.limit, Some(Scalar::from(0u64)));
        assert_eq!(filter.pagination.skip, Some(Scalar::from(20u64)));
        assert_eq!(filter.pagination.sort[0].direction, Direction::Asc);
        assert_eq!(filter.pagination.sort[1].direction, Direction::Desc);
    }

    #[test]
    fn test_parse_pagination_null_is_kept() {
        let filter = parse_filter_object(&json!({"$limit": null})).unwrap();
        assert_eq!(filter.pagination.limit, Some(Scalar::Null));
        assert!(filter.pagination.skip.is_none());
    }

    #[test]
    fn test_parse_pagination_composite_rejected() {
        let result = parse_filter_object(&json!({"$skip": [1]}));
        assert_eq!(result, Err(CompileError::InvalidPagination("$skip".to_string())));
    }

    #[test]
    fn test_condition_errors_reported_before_sort_errors() {
        let result = parse_filter_object(&json!({"$sort": {"a-b": 1}, "c d": 1}));
        assert_eq!(result, Err(CompileError::InvalidFieldName("c d".to_string())));
    }
}
