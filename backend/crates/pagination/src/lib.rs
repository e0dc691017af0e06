//! Page size, sort direction and page-count primitives.
//!
//! Listings in the attendance backend are numbered pages of a fixed,
//! externally configured size. This crate keeps the arithmetic in one place
//! so services and persistence adapters agree on offsets and totals.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building pagination primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// A page must hold at least one item.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Number of items per page.
///
/// ## Invariants
/// - Always greater than zero.
///
/// # Examples
/// ```
/// use pagination::PageSize;
///
/// let size = PageSize::new(25).expect("non-zero size");
/// assert_eq!(size.get(), 25);
/// assert!(PageSize::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(NonZeroU32);

impl PageSize {
    /// Validate and construct a page size.
    pub fn new(size: u32) -> Result<Self, PaginationError> {
        NonZeroU32::new(size)
            .map(Self)
            .ok_or(PaginationError::ZeroPageSize)
    }

    /// Raw item count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for PageSize {
    type Error = PaginationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u32 {
    fn from(value: PageSize) -> Self {
        value.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Ordering applied to the listing's sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest key first.
    #[default]
    Ascending,
    /// Largest key first.
    Descending,
}

impl SortDirection {
    /// Map an `ascending` flag onto a direction.
    #[must_use]
    pub const fn from_ascending(ascending: bool) -> Self {
        if ascending {
            Self::Ascending
        } else {
            Self::Descending
        }
    }

    /// Apply the direction to an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// A zero-based page of a sorted listing.
///
/// # Examples
/// ```
/// use pagination::{PageRequest, PageSize, SortDirection};
///
/// let size = PageSize::new(10).expect("non-zero size");
/// let request = PageRequest::new(2, size, SortDirection::Ascending);
/// assert_eq!(request.offset(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    number: u32,
    size: PageSize,
    direction: SortDirection,
}

impl PageRequest {
    /// Build a request for page `number` (zero-based).
    #[must_use]
    pub const fn new(number: u32, size: PageSize, direction: SortDirection) -> Self {
        Self {
            number,
            size,
            direction,
        }
    }

    /// Zero-based page number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Items per page.
    #[must_use]
    pub const fn size(&self) -> PageSize {
        self.size
    }

    /// Requested sort direction.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Index of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.number).saturating_mul(u64::from(self.size.get()))
    }

    /// Borrow the items of this page out of an already sorted slice.
    ///
    /// Pages past the end yield an empty slice.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let len = usize::try_from(self.size.get()).unwrap_or(usize::MAX);
        let end = start.saturating_add(len).min(items.len());
        items.get(start..end).unwrap_or(&[])
    }
}

/// Number of pages needed to show `total` items, rounding up.
///
/// # Examples
/// ```
/// use pagination::{PageSize, page_count};
///
/// let size = PageSize::new(10).expect("non-zero size");
/// assert_eq!(page_count(0, size), 0);
/// assert_eq!(page_count(10, size), 1);
/// assert_eq!(page_count(11, size), 2);
/// ```
#[must_use]
pub const fn page_count(total: u64, size: PageSize) -> u64 {
    total.div_ceil(size.get() as u64)
}
