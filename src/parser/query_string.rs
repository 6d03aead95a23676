use super::common::bracket_segment;
use crate::config::{MAX_ARRAY_INDEX, MAX_PARAMETERS, MAX_QUERY_DEPTH};
use nom::{
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, opt, recognize},
    sequence::{pair, tuple},
    IResult,
};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Decodes a URL query string with bracketed keys into a nested JSON value.
///
/// Values are coerced the way filter objects expect them: `true`/`false`
/// become booleans, `null` becomes null, numeric text becomes a number and
/// `undefined` drops the pair entirely.
///
/// Decoding never fails. Pairs with an empty name are skipped, and only the
/// first `MAX_PARAMETERS` pairs are read.
///
/// # Examples
///
/// ```
/// use query_to_pg::parse_query_string;
/// use serde_json::json;
///
/// let value = parse_query_string("age[$gte]=18&$or[0][status]=active&$or[1][status]=null");
/// assert_eq!(
///     value,
///     json!({"age": {"$gte": 18}, "$or": [{"status": "active"}, {"status": null}]})
/// );
/// ```
pub fn parse_query_string(query_string: &str) -> Value {
    let query_string = query_string.strip_prefix('?').unwrap_or(query_string);
    let mut root = Node::Map(Vec::new());

    let pairs = url::form_urlencoded::parse(query_string.as_bytes()).take(MAX_PARAMETERS);
    for (key, raw) in pairs {
        if key.is_empty() {
            tracing::trace!(value = %raw, "skipped query parameter without a name");
            continue;
        }

        let Some(value) = coerce_value(&raw) else {
            continue;
        };

        let segments = split_key(&key);
        tracing::trace!(key = %key, depth = segments.len(), "decoded query parameter");
        root.insert(&segments, value);
    }

    root.into_value()
}

/// Applies the leaf coercion rules to one decoded value.
///
/// Returns `None` for `undefined`, which means "leave the key out".
pub fn coerce_value(raw: &str) -> Option<Value> {
    match raw {
        "" => Some(Value::String(String::new())),
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "null" => Some(Value::Null),
        "undefined" => None,
        _ => Some(
            parse_number(raw)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(raw.to_string())),
        ),
    }
}

fn numeric_literal(i: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(one_of("+-")),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(i)
}

/// Parses text matching `^[+-]?\d+(\.\d+)?$` into a finite JSON number.
/// Whole values are kept as integers when they fit.
fn parse_number(raw: &str) -> Option<Number> {
    all_consuming(numeric_literal)(raw).ok()?;

    if let Ok(int) = raw.parse::<i64>() {
        return Some(int.into());
    }

    let float = raw.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some((float as i64).into())
    } else {
        Number::from_f64(float)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
    Push,
}

impl Segment {
    fn from_bracket(text: &str) -> Self {
        if text.is_empty() {
            return Segment::Push;
        }
        match text.parse::<usize>() {
            Ok(index) if index <= MAX_ARRAY_INDEX && index.to_string() == text => {
                Segment::Index(index)
            }
            _ => Segment::Key(text.to_string()),
        }
    }
}

/// Splits `a[b][c]` into its root and bracket segments.
///
/// Past `MAX_QUERY_DEPTH` segments, or at the first malformed bracket, the
/// rest of the key becomes one literal segment. A key whose first bracket is
/// malformed is kept whole.
fn split_key(key: &str) -> Vec<Segment> {
    let root_end = key.find('[').unwrap_or(key.len());
    let (root, mut rest) = key.split_at(root_end);

    let mut segments = Vec::new();
    if !root.is_empty() {
        segments.push(Segment::Key(root.to_string()));
    }

    let mut depth = 0;
    while !rest.is_empty() && depth < MAX_QUERY_DEPTH {
        match bracket_segment(rest) {
            Ok((remaining, text)) => {
                if segments.is_empty() {
                    segments.push(Segment::Key(text.to_string()));
                } else {
                    segments.push(Segment::from_bracket(text));
                }
                rest = remaining;
                depth += 1;
            }
            Err(_) if depth == 0 => return vec![Segment::Key(key.to_string())],
            Err(_) => break,
        }
    }

    if !rest.is_empty() {
        segments.push(Segment::Key(rest.to_string()));
    }
    segments
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf(Value),
    List(BTreeMap<usize, Node>),
    Map(Vec<(String, Node)>),
}

impl Node {
    fn insert(&mut self, segments: &[Segment], value: Value) {
        match segments.split_first() {
            None => self.combine(value),
            Some((segment, rest)) => self.child(segment, rest, value),
        }
    }

    /// A repeated key turns a leaf into a list of every value seen.
    fn combine(&mut self, value: Value) {
        match self {
            Node::Leaf(existing) => {
                let mut list = BTreeMap::new();
                list.insert(0, Node::Leaf(existing.take()));
                list.insert(1, Node::Leaf(value));
                *self = Node::List(list);
            }
            Node::List(list) => {
                let next = list.keys().next_back().map_or(0, |last| last + 1);
                list.insert(next, Node::Leaf(value));
            }
            Node::Map(entries) => {
                let key = match &value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                upsert(entries, key, Node::Leaf(Value::Bool(true)));
            }
        }
    }

    fn child(&mut self, segment: &Segment, rest: &[Segment], value: Value) {
        if let Node::Leaf(existing) = self {
            let mut list = BTreeMap::new();
            list.insert(0, Node::Leaf(existing.take()));
            *self = Node::List(list);
        }
        if matches!((&*self, segment), (Node::List(_), Segment::Key(_))) {
            self.list_to_map();
        }

        match (self, segment) {
            (Node::List(list), Segment::Index(index)) => {
                insert_into(list.entry(*index).or_insert_with(|| placeholder(rest)), rest, value)
            }
            (Node::List(list), Segment::Push) => {
                let next = list.keys().next_back().map_or(0, |last| last + 1);
                insert_into(list.entry(next).or_insert_with(|| placeholder(rest)), rest, value)
            }
            (Node::Map(entries), segment) => {
                let key = match segment {
                    Segment::Key(key) => key.clone(),
                    Segment::Index(index) => index.to_string(),
                    Segment::Push => entries.len().to_string(),
                };
                let position = entries.iter().position(|(k, _)| *k == key);
                let slot = match position {
                    Some(position) => &mut entries[position].1,
                    None => {
                        entries.push((key, placeholder(rest)));
                        let last = entries.len() - 1;
                        &mut entries[last].1
                    }
                };
                insert_into(slot, rest, value);
            }
            // normalized away above
            (Node::Leaf(_), _) | (Node::List(_), Segment::Key(_)) => {}
        }
    }

    fn list_to_map(&mut self) {
        if let Node::List(list) = self {
            let entries = std::mem::take(list)
                .into_iter()
                .map(|(index, node)| (index.to_string(), node))
                .collect();
            *self = Node::Map(entries);
        }
    }

    fn into_value(self) -> Value {
        match self {
            Node::Leaf(value) => value,
            Node::List(list) => Value::Array(list.into_values().map(Node::into_value).collect()),
            Node::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, node)| (key, node.into_value()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

/// Empty container matching the next segment, or an empty leaf slot.
fn placeholder(rest: &[Segment]) -> Node {
    match rest.first() {
        Some(Segment::Index(_)) | Some(Segment::Push) => Node::List(BTreeMap::new()),
        Some(Segment::Key(_)) => Node::Map(Vec::new()),
        None => Node::List(BTreeMap::new()),
    }
}

fn insert_into(slot: &mut Node, rest: &[Segment], value: Value) {
    if rest.is_empty() && is_empty_container(slot) {
        *slot = Node::Leaf(value);
    } else {
        slot.insert(rest, value);
    }
}

fn is_empty_container(node: &Node) -> bool {
    match node {
        Node::List(list) => list.is_empty(),
        Node::Map(entries) => entries.is_empty(),
        Node::Leaf(_) => false,
    }
}

fn upsert(entries: &mut Vec<(String, Node)>, key: String, node: Node) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some((_, existing)) => *existing = node,
        None => entries.push((key, node)),
    }
}
