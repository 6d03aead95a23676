use super::Field;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// Numeric `1` sorts ascending; every other value sorts descending.
    pub fn from_value(value: &Value) -> Self {
        match value.as_f64() {
            Some(n) if n == 1.0 => Direction::Asc,
            _ => Direction::Desc,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortTerm {
    pub field: Field,
    pub direction: Direction,
}

impl SortTerm {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn desc(mut self) -> Self {
        self.direction = Direction::Desc;
        self
    }
}
