use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A bind-ready value: anything JSON can hold except arrays and objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// Returns `None` for arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Scalar::Null),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => Some(Scalar::Number(n.clone())),
            Value::String(s) => Some(Scalar::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Number(n) => Value::Number(n.clone()),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<u64> for Scalar {
    fn from(n: u64) -> Self {
        Scalar::Number(n.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_from_json() {
        assert_eq!(Scalar::from_json(&json!(null)), Some(Scalar::Null));
        assert_eq!(Scalar::from_json(&json!(true)), Some(Scalar::Bool(true)));
        assert_eq!(Scalar::from_json(&json!(18)), Some(Scalar::from(18i64)));
        assert_eq!(Scalar::from_json(&json!("x")), Some(Scalar::from("x")));
    }

    #[test]
    fn test_scalar_rejects_composites() {
        assert!(Scalar::from_json(&json!([1, 2])).is_none());
        assert!(Scalar::from_json(&json!({"a": 1})).is_none());
    }

    #[test]
    fn test_scalar_to_json() {
        let float = Scalar::Number(Number::from_f64(2.5).unwrap());
        assert_eq!(float.to_json(), json!(2.5));
        assert_eq!(Scalar::Null.to_json(), Value::Null);
    }

    #[test]
    fn test_scalar_untagged_serialization() {
        let values = vec![Scalar::Null, Scalar::from(1i64), Scalar::from("a")];
        assert_eq!(serde_json::to_value(&values).unwrap(), json!([null, 1, "a"]));
    }
}
