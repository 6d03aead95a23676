use crate::error::CompileError;
use crate::parser::common::is_identifier;
use serde::{Deserialize, Serialize};

/// A column name that has passed the identifier check.
///
/// Field names are interpolated into the SQL text unescaped, so a `Field` can
/// only be built from a name made of ASCII letters, digits and `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Field {
    name: String,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Result<Self, CompileError> {
        let name = name.into();
        if is_identifier(&name) {
            Ok(Self { name })
        } else {
            Err(CompileError::InvalidFieldName(name))
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TryFrom<String> for Field {
    type Error = CompileError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Field::new(name)
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.name
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
