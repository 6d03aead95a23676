pub mod builder;

pub use builder::{placeholder, CompiledQuery, Fragments, QueryBuilder, FIRST_PLACEHOLDER};
