pub mod common;
pub mod filter;
pub mod order;
pub mod query_string;

pub use common::{identifier, is_identifier};
pub use filter::{classify_key, parse_condition, parse_disjunction, parse_filter_object, KeyKind};
pub use order::{parse_sort, parse_sort_term};
pub use query_string::{coerce_value, parse_query_string};
