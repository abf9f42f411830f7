//! Pagination window (`from` offset + `size` page length).

use crate::error::{DomainError, DomainResult};

pub const DEFAULT_FROM: i64 = 0;
pub const DEFAULT_SIZE: i64 = 10;

/// Validated `from`/`size` pair.
///
/// Two readings exist: [`PageRequest::window`] treats `from` as an absolute
/// offset (booking lists), while [`PageRequest::page_offset`] snaps it down
/// to the start of the page that contains it (store-paged lists).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    from: usize,
    size: usize,
}

impl PageRequest {
    pub fn new(from: i64, size: i64) -> DomainResult<Self> {
        if from < 0 {
            return Err(DomainError::validation("from must be greater than or equal to 0"));
        }
        if size < 1 {
            return Err(DomainError::validation("size must be greater than 0"));
        }
        let from = usize::try_from(from).map_err(|_| DomainError::validation("from is too large"))?;
        let size = usize::try_from(size).map_err(|_| DomainError::validation("size is too large"))?;
        Ok(Self { from, size })
    }

    /// Build from optional query values, applying the defaults.
    pub fn from_query(from: Option<i64>, size: Option<i64>) -> DomainResult<Self> {
        Self::new(from.unwrap_or(DEFAULT_FROM), size.unwrap_or(DEFAULT_SIZE))
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Offset of the page containing `from`: `(from / size) * size`.
    pub fn page_offset(&self) -> usize {
        (self.from / self.size) * self.size
    }

    /// Elements `[from, from + size)` of an already ordered sequence.
    pub fn window<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items.into_iter().skip(self.from).take(self.size).collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { from: 0, size: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_from_and_empty_pages() {
        assert!(matches!(PageRequest::new(-1, 10), Err(DomainError::Validation(_))));
        assert!(matches!(PageRequest::new(0, 0), Err(DomainError::Validation(_))));
        assert!(PageRequest::new(0, 1).is_ok());
    }

    #[test]
    fn query_defaults_apply() {
        let page = PageRequest::from_query(None, None).unwrap();
        assert_eq!(page, PageRequest::default());
        assert_eq!((page.from(), page.size()), (0, 10));
    }

    #[test]
    fn window_uses_absolute_offset_and_clips() {
        let page = PageRequest::new(3, 4).unwrap();
        assert_eq!(page.window(0..5), vec![3, 4]);
        assert_eq!(PageRequest::new(9, 2).unwrap().window(0..5), Vec::<i32>::new());
    }

    #[test]
    fn page_offset_snaps_to_page_start() {
        assert_eq!(PageRequest::new(0, 10).unwrap().page_offset(), 0);
        assert_eq!(PageRequest::new(7, 5).unwrap().page_offset(), 5);
        assert_eq!(PageRequest::new(4, 5).unwrap().page_offset(), 0);
    }
}
