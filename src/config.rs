//! Shared constants for the compiler, the query-string decoder and the schema validator.

/// Page size bound to `LIMIT` when a filter carries no `$limit`.
pub const DEFAULT_LIMIT: u64 = 10;

/// Reserved key holding the disjunction group.
pub const OR_KEY: &str = "$or";
/// Reserved key holding the page size.
pub const LIMIT_KEY: &str = "$limit";
/// Reserved key holding the number of rows to skip.
pub const SKIP_KEY: &str = "$skip";
/// Reserved key holding the field-to-direction sort mapping.
pub const SORT_KEY: &str = "$sort";

/// Maximum number of bracketed segments decoded from one query-string key.
pub const MAX_QUERY_DEPTH: usize = 5;
/// Highest numeric bracket segment still decoded as an array index.
pub const MAX_ARRAY_INDEX: usize = 20;
/// Number of `key=value` pairs read from one query string; later pairs are ignored.
pub const MAX_PARAMETERS: usize = 1000;

/// Returns true for the pagination directives, which never name a column.
pub fn is_pagination_key(key: &str) -> bool {
    matches!(key, LIMIT_KEY | SKIP_KEY | SORT_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pagination_key() {
        assert!(is_pagination_key("$limit"));
        assert!(is_pagination_key("$skip"));
        assert!(is_pagination_key("$sort"));
        assert!(!is_pagination_key("$or"));
        assert!(!is_pagination_key("limit"));
    }
}
