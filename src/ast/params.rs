use super::{Scalar, SortTerm};
use serde::{Deserialize, Serialize};

/// The `$limit`, `$skip` and `$sort` directives of a filter object.
///
/// `limit` and `skip` hold whatever scalar the caller supplied, `null`
/// included; `None` means the directive was absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: Option<Scalar>,
    pub skip: Option<Scalar>,
    pub sort: Vec<SortTerm>,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: impl Into<Scalar>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    pub fn with_skip(mut self, skip: impl Into<Scalar>) -> Self {
        self.skip = Some(skip.into());
        self
    }

    pub fn with_sort(mut self, sort: Vec<SortTerm>) -> Self {
        self.sort = sort;
        self
    }
}
