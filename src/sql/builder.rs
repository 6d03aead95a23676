use crate::ast::*;
use crate::config::DEFAULT_LIMIT;
use serde_json::Value;

/// Index of the first positional placeholder, `$1`.
pub const FIRST_PLACEHOLDER: usize = 1;

/// A SQL fragment ready to append to a base statement, with its bind values.
///
/// `values[i]` is bound to placeholder `$i+1`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledQuery {
    pub sql: String,
    pub values: Vec<Value>,
}

/// SQL pieces produced by one builder step, the values they bind, and the
/// placeholder index the next step must start from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragments {
    pub sql: Vec<String>,
    pub values: Vec<Value>,
    pub next_index: usize,
}

impl Fragments {
    pub fn starting_at(index: usize) -> Self {
        Self {
            sql: Vec::new(),
            values: Vec::new(),
            next_index: index,
        }
    }

    fn bind(&mut self, value: Value) -> String {
        let marker = placeholder(self.next_index);
        self.next_index += 1;
        self.values.push(value);
        marker
    }
}

pub fn placeholder(index: usize) -> String {
    format!("${}", index)
}

/// Compiles a classified [`FilterObject`] into clause text and bind values.
///
/// The builder holds no counters of its own: each step receives the next
/// placeholder index and hands back the advanced one in its [`Fragments`],
/// so every step can be called and tested in isolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder<'a> {
    prefixes: Option<&'a PrefixMap>,
}

impl<'a> QueryBuilder<'a> {
    pub fn new() -> Self {
        Self { prefixes: None }
    }

    pub fn with_prefix_map(mut self, prefixes: &'a PrefixMap) -> Self {
        self.prefixes = Some(prefixes);
        self
    }

    /// Appends WHERE, ORDER BY, LIMIT and OFFSET to `base_sql`.
    ///
    /// Empty sections are left out and the rest are joined by single spaces.
    pub fn build(&self, base_sql: &str, filter: &FilterObject) -> CompiledQuery {
        let where_clause = self.build_where_clause(&filter.entries, FIRST_PLACEHOLDER);
        let order_by = self.build_order_by(&filter.pagination.sort);
        let limit_offset = self.build_limit_offset(&filter.pagination, where_clause.next_index);

        let sql = std::iter::once(base_sql.trim().to_string())
            .chain(where_clause.sql)
            .chain(order_by)
            .chain(limit_offset.sql)
            .filter(|section| !section.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let mut values = where_clause.values;
        values.extend(limit_offset.values);

        tracing::debug!(sql = %sql, params = values.len(), "compiled filter");

        CompiledQuery { sql, values }
    }

    /// Builds `WHERE (<or-group>) AND <and-group>`, or nothing when there are
    /// no conditions.
    ///
    /// Entries are processed in order, so placeholders follow document order
    /// even though disjunction groups are rendered first.
    pub fn build_where_clause(&self, entries: &[FilterEntry], index: usize) -> Fragments {
        let mut out = Fragments::starting_at(index);
        let mut disjunctions: Vec<String> = Vec::new();
        let mut conjunctions: Vec<String> = Vec::new();

        for entry in entries {
            let (target, built) = match entry {
                FilterEntry::Or(group) => (
                    &mut disjunctions,
                    self.build_disjunction(group, out.next_index),
                ),
                FilterEntry::Field { field, condition } => (
                    &mut conjunctions,
                    self.build_condition(field, condition, out.next_index),
                ),
            };
            target.extend(built.sql);
            out.values.extend(built.values);
            out.next_index = built.next_index;
        }

        let mut parts = disjunctions;
        if !conjunctions.is_empty() {
            parts.push(conjunctions.join(" AND "));
        }
        if !parts.is_empty() {
            out.sql.push(format!("WHERE {}", parts.join(" AND ")));
        }
        out
    }

    /// Builds the predicates for one field. Several comparisons on the same
    /// field yield several fragments, which the caller conjoins.
    pub fn build_condition(&self, field: &Field, condition: &Condition, index: usize) -> Fragments {
        let column = self.column(field);
        let mut out = Fragments::starting_at(index);

        match condition {
            Condition::IsNull => out.sql.push(format!("{} IS NULL", column)),
            Condition::Equals(value) if value.is_null() => {
                out.sql.push(format!("{} IS NULL", column))
            }
            Condition::Equals(value) => {
                let marker = out.bind(value.to_json());
                out.sql.push(format!("{} = {}", column, marker));
            }
            Condition::Compare(comparisons) => {
                for comparison in comparisons {
                    if comparison.is_not_null_check() {
                        out.sql.push(format!("{} IS NOT NULL", column));
                    } else {
                        let marker = out.bind(comparison.value.to_json());
                        out.sql.push(format!(
                            "{} {} {}",
                            column,
                            comparison.operator.sql(),
                            marker
                        ));
                    }
                }
            }
        }

        out
    }

    /// Builds one parenthesized `OR` group from every entry's predicates.
    ///
    /// The `$ne: null` check looks at each comparison's own value, exactly as
    /// for top-level fields.
    pub fn build_disjunction(&self, entries: &[DisjunctionEntry], index: usize) -> Fragments {
        let mut group = Fragments::starting_at(index);

        for entry in entries {
            let built = self.build_condition(&entry.field, &entry.condition, group.next_index);
            group.sql.extend(built.sql);
            group.values.extend(built.values);
            group.next_index = built.next_index;
        }

        if !group.sql.is_empty() {
            group.sql = vec![format!("({})", group.sql.join(" OR "))];
        }
        group
    }

    pub fn build_order_by(&self, sort: &[SortTerm]) -> Option<String> {
        if sort.is_empty() {
            return None;
        }

        let terms: Vec<String> = sort
            .iter()
            .map(|term| format!("{} {}", self.column(&term.field), term.direction.sql()))
            .collect();
        Some(format!("ORDER BY {}", terms.join(", ")))
    }

    /// LIMIT is always bound, falling back to [`DEFAULT_LIMIT`]; OFFSET only
    /// when a skip value was supplied.
    pub fn build_limit_offset(&self, pagination: &Pagination, index: usize) -> Fragments {
        let mut out = Fragments::starting_at(index);

        let limit = pagination
            .limit
            .as_ref()
            .map(Scalar::to_json)
            .unwrap_or_else(|| Value::from(DEFAULT_LIMIT));
        let limit_ref = out.bind(limit);
        out.sql.push(format!("LIMIT {}", limit_ref));

        if let Some(skip) = &pagination.skip {
            let skip_ref = out.bind(skip.to_json());
            out.sql.push(format!("OFFSET {}", skip_ref));
        }

        out
    }

    fn column(&self, field: &Field) -> String {
        match self.prefixes {
            Some(prefixes) => prefixes.qualify(field.name()),
            None => field.name().to_string(),
        }
    }
}
