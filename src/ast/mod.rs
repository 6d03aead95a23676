pub mod field;
pub mod filter;
pub mod order;
pub mod params;
pub mod prefix;
pub mod scalar;

pub use field::Field;
pub use filter::{Comparison, ComparisonOperator, Condition, DisjunctionEntry, FilterEntry, FilterObject};
pub use order::{Direction, SortTerm};
pub use params::Pagination;
pub use prefix::PrefixMap;
pub use scalar::Scalar;
