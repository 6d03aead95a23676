use crate::error::CompileError;
use crate::parser::is_identifier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field name to table alias, for base queries that join several tables.
///
/// Aliases are checked as identifiers on the way in, so `qualify` only ever
/// renders `[A-Za-z0-9_]+` text. An empty alias means "no prefix".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct PrefixMap(HashMap<String, String>);

impl PrefixMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(
        mut self,
        field: impl Into<String>,
        alias: impl Into<String>,
    ) -> Result<Self, CompileError> {
        let alias = alias.into();
        check_alias(&alias)?;
        self.0.insert(field.into(), alias);
        Ok(self)
    }

    pub fn prefix(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .map(String::as_str)
            .filter(|alias| !alias.is_empty())
    }

    /// Renders `alias.field`, or just `field` when no alias is mapped.
    pub fn qualify(&self, field: &str) -> String {
        match self.prefix(field) {
            Some(alias) => format!("{}.{}", alias, field),
            None => field.to_string(),
        }
    }
}

fn check_alias(alias: &str) -> Result<(), CompileError> {
    if alias.is_empty() || is_identifier(alias) {
        Ok(())
    } else {
        Err(CompileError::InvalidPrefix(alias.to_string()))
    }
}

impl TryFrom<HashMap<String, String>> for PrefixMap {
    type Error = CompileError;

    fn try_from(map: HashMap<String, String>) -> Result<Self, Self::Error> {
        map.values().try_for_each(|alias| check_alias(alias))?;
        Ok(Self(map))
    }
}

impl From<PrefixMap> for HashMap<String, String> {
    fn from(prefixes: PrefixMap) -> Self {
        prefixes.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_with_prefix() {
        let prefixes = PrefixMap::new().with_prefix("age", "u").unwrap();
        assert_eq!(prefixes.qualify("age"), "u.age");
        assert_eq!(prefixes.qualify("name"), "name");
    }

    #[test]
    fn test_empty_alias_means_no_prefix() {
        let prefixes = PrefixMap::new().with_prefix("age", "").unwrap();
        assert_eq!(prefixes.qualify("age"), "age");
    }

    #[test]
    fn test_with_prefix_rejects_non_identifier_alias() {
        let result = PrefixMap::new().with_prefix("age", "u; DROP TABLE x; --");
        assert_eq!(
            result,
            Err(CompileError::InvalidPrefix("u; DROP TABLE x; --".to_string()))
        );
        assert!(PrefixMap::new().with_prefix("age", "public.u").is_err());
    }

    #[test]
    fn test_prefix_map_try_from() {
        let map = HashMap::from([("id".to_string(), "o".to_string())]);
        let prefixes = PrefixMap::try_from(map).unwrap();
        assert_eq!(prefixes.prefix("id"), Some("o"));

        let bad = HashMap::from([("id".to_string(), "o o".to_string())]);
        assert!(PrefixMap::try_from(bad).is_err());
    }

    #[test]
    fn test_prefix_map_deserialize() {
        let prefixes: PrefixMap = serde_json::from_str(r#"{"age":"u"}"#).unwrap();
        assert_eq!(prefixes.qualify("age"), "u.age");

        let rejected = serde_json::from_str::<PrefixMap>(r#"{"age":"u; DROP TABLE x; --"}"#);
        assert!(rejected.is_err());
    }
}
