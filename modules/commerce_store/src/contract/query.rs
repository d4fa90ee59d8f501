//! List query parameters: filter, ordering and pagination

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Limit/offset window over an ordered result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub const DEFAULT_LIMIT: u64 = 100;

    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// The page following this one
    pub fn next(self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}

/// Query for `Repository::list`
///
/// `F` is the record's filter type and `S` its sort key. Results are ordered
/// by `sort` in `direction`, ties broken by id ascending.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListQuery<F, S> {
    pub filter: F,
    pub sort: S,
    pub direction: SortDirection,
    pub page: Page,
}

impl<F, S: Default> ListQuery<F, S> {
    pub fn new(filter: F) -> Self {
        Self {
            filter,
            sort: S::default(),
            direction: SortDirection::default(),
            page: Page::default(),
        }
    }
}

impl<F, S> ListQuery<F, S> {
    pub fn sorted_by(mut self, sort: S, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
        self
    }

    pub fn paged(mut self, limit: u64, offset: u64) -> Self {
        self.page = Page::new(limit, offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_page_advances_offset_by_limit() {
        let page = Page::new(25, 50).next();
        assert_eq!(page, Page::new(25, 75));
    }

    #[test]
    fn next_page_saturates() {
        let page = Page::new(10, u64::MAX - 3).next();
        assert_eq!(page.offset, u64::MAX);
    }

    #[test]
    fn builder_sets_sort_and_page() {
        let query: ListQuery<(), u8> = ListQuery::new(())
            .sorted_by(3, SortDirection::Desc)
            .paged(5, 10);
        assert_eq!(query.sort, 3);
        assert_eq!(query.direction, SortDirection::Desc);
        assert_eq!(query.page, Page::new(5, 10));
    }
}
