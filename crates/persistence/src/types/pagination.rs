//! Offset pagination and sorting.
//!
//! Paging follows the `page` / `size` / `sort=<property>,<asc|desc>` convention
//! used by the admin frontend: `page` is zero-based and `sort` may repeat.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::error::CriteriaError;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// Returns the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    /// The transport property name (e.g. `placedDate`).
    pub property: String,
    pub direction: Direction,
}

impl SortOrder {
    /// Parses `property` or `property,asc|desc`.
    pub fn parse(raw: &str) -> Result<Self, CriteriaError> {
        let mut parts = raw.split(',').map(str::trim);
        let property = parts.next().unwrap_or_default();
        if property.is_empty() {
            return Err(CriteriaError::InvalidPaging {
                parameter: "sort".to_string(),
                message: "missing sort property".to_string(),
            });
        }

        let direction = match parts.next() {
            None | Some("") => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(other) => {
                return Err(CriteriaError::InvalidPaging {
                    parameter: "sort".to_string(),
                    message: format!("unknown direction '{}'", other),
                });
            }
        };

        Ok(Self {
            property: property.to_string(),
            direction,
        })
    }
}

/// A request for one page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page number.
    pub page: u32,
    /// Page size.
    pub size: u32,
    /// Sort keys, most significant first.
    #[serde(default)]
    pub sort: Vec<SortOrder>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort: Vec::new(),
        }
    }
}

impl PageRequest {
    /// Creates a page request without sorting.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    /// Adds a sort key.
    pub fn with_sort(mut self, property: impl Into<String>, direction: Direction) -> Self {
        self.sort.push(SortOrder {
            property: property.into(),
            direction,
        });
        self
    }

    /// Returns the row offset of the first element.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    /// Creates a page for the given request.
    pub fn new(content: Vec<T>, total_elements: u64, request: &PageRequest) -> Self {
        Self {
            content,
            total_elements,
            page: request.page,
            size: request.size,
        }
    }

    /// An empty page for the given request.
    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }

    /// Number of pages needed for all matches.
    pub fn total_pages(&self) -> u32 {
        if self.size == 0 {
            return 0;
        }
        u32::try_from(self.total_elements.div_ceil(u64::from(self.size))).unwrap_or(u32::MAX)
    }

    /// Returns true if a page follows this one.
    pub fn has_next(&self) -> bool {
        self.page
            .checked_add(1)
            .is_some_and(|next| next < self.total_pages())
    }

    /// Returns true if a page precedes this one.
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// Converts the content, keeping the paging metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            page: self.page,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parse() {
        let sort = SortOrder::parse("placedDate,desc").unwrap();
        assert_eq!(sort.property, "placedDate");
        assert_eq!(sort.direction, Direction::Desc);

        let sort = SortOrder::parse("id").unwrap();
        assert_eq!(sort.direction, Direction::Asc);

        assert!(SortOrder::parse(",asc").is_err());
        assert!(SortOrder::parse("id,sideways").is_err());
    }

    #[test]
    fn test_page_navigation() {
        let request = PageRequest::new(1, 10);
        let page: Page<u32> = Page::new((10..20).collect(), 25, &request);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());
        assert_eq!(request.offset(), 10);

        let last = Page::<u32>::new(vec![], 25, &PageRequest::new(2, 10));
        assert!(!last.has_next());
    }

    #[test]
    fn test_last_possible_page_has_no_next() {
        let page = Page::<u32>::new(vec![], 3, &PageRequest::new(u32::MAX, 20));
        assert!(!page.has_next());
        assert!(page.has_previous());
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], 7, &PageRequest::new(0, 2)).map(|n| n * 10);
        assert_eq!(page.content, vec![10, 20]);
        assert_eq!(page.total_elements, 7);
    }
}
