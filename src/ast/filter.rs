use super::{Field, Pagination, Scalar};
use serde::{Deserialize, Serialize};

/// The comparison directives accepted inside a comparison object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "$gt")]
    Gt,
    #[serde(rename = "$lt")]
    Lt,
    #[serde(rename = "$gte")]
    Gte,
    #[serde(rename = "$lte")]
    Lte,
    #[serde(rename = "$ne")]
    Ne,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 5] = [
        ComparisonOperator::Gt,
        ComparisonOperator::Lt,
        ComparisonOperator::Gte,
        ComparisonOperator::Lte,
        ComparisonOperator::Ne,
    ];

    /// Exact, case-sensitive lookup of a directive such as `$gte`.
    pub fn from_directive(directive: &str) -> Option<Self> {
        match directive {
            "$gt" => Some(ComparisonOperator::Gt),
            "$lt" => Some(ComparisonOperator::Lt),
            "$gte" => Some(ComparisonOperator::Gte),
            "$lte" => Some(ComparisonOperator::Lte),
            "$ne" => Some(ComparisonOperator::Ne),
            _ => None,
        }
    }

    pub fn directive(&self) -> &'static str {
        match self {
            ComparisonOperator::Gt => "$gt",
            ComparisonOperator::Lt => "$lt",
            ComparisonOperator::Gte => "$gte",
            ComparisonOperator::Lte => "$lte",
            ComparisonOperator::Ne => "$ne",
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Lte => "<=",
            ComparisonOperator::Ne => "!=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub operator: ComparisonOperator,
    pub value: Scalar,
}

impl Comparison {
    pub fn new(operator: ComparisonOperator, value: impl Into<Scalar>) -> Self {
        Self {
            operator,
            value: value.into(),
        }
    }

    /// `{$ne: null}` renders as `IS NOT NULL` and binds nothing.
    pub fn is_not_null_check(&self) -> bool {
        self.operator == ComparisonOperator::Ne && self.value.is_null()
    }
}

/// What a single field is constrained to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Condition {
    /// Plain equality against a non-null scalar.
    Equals(Scalar),
    IsNull,
    /// Conjoined comparisons, in the order they were written.
    Compare(Vec<Comparison>),
}

impl Condition {
    pub fn equals(value: impl Into<Scalar>) -> Self {
        match value.into() {
            Scalar::Null => Condition::IsNull,
            scalar => Condition::Equals(scalar),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisjunctionEntry {
    pub field: Field,
    pub condition: Condition,
}

impl DisjunctionEntry {
    pub fn new(field: Field, condition: Condition) -> Self {
        Self { field, condition }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterEntry {
    Field { field: Field, condition: Condition },
    Or(Vec<DisjunctionEntry>),
}

/// A classified filter object: conditions in document order plus pagination.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterObject {
    pub entries: Vec<FilterEntry>,
    pub pagination: Pagination,
}

impl FilterObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_condition(mut self, field: Field, condition: Condition) -> Self {
        self.entries.push(FilterEntry::Field { field, condition });
        self
    }

    pub fn with_or(mut self, entries: Vec<DisjunctionEntry>) -> Self {
        self.entries.push(FilterEntry::Or(entries));
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }
}
