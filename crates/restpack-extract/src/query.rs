//! Query string decoding and pagination.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

/// Page size used when the request does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 1000;

/// Failure to decode a query string.
#[derive(Debug, Error)]
#[error("invalid query string: {0}")]
pub struct QueryError(#[from] serde_urlencoded::de::Error);

/// Decodes a raw query string (without the leading `?`) into `T`.
pub fn parse_query<T: DeserializeOwned>(query: &str) -> Result<T, QueryError> {
    Ok(serde_urlencoded::from_str(query)?)
}

/// Page selection read from `pagesize` and `pagenumber`.
///
/// Page numbers are 1-based. Missing, unparseable or non-positive values
/// fall back to page size [`DEFAULT_PAGE_SIZE`] and page 1.
///
/// # Example
///
/// ```rust
/// use restpack_extract::Pagination;
///
/// let page = Pagination::from_query(Some("pagesize=100&pagenumber=9"));
/// assert_eq!(page.limit(), 100);
/// assert_eq!(page.offset(), 800);
///
/// let page = Pagination::from_query(None);
/// assert_eq!((page.limit(), page.offset()), (1000, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: i64,
    page_number: i64,
}

#[derive(Deserialize)]
struct RawPagination {
    pagesize: Option<String>,
    pagenumber: Option<String>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
        }
    }
}

impl Pagination {
    /// Reads pagination from a raw query string.
    #[must_use]
    pub fn from_query(query: Option<&str>) -> Self {
        let Some(raw) = query.and_then(|q| serde_urlencoded::from_str::<RawPagination>(q).ok())
        else {
            return Self::default();
        };

        let defaults = Self::default();
        Self {
            page_size: positive(raw.pagesize.as_deref()).unwrap_or(defaults.page_size),
            page_number: positive(raw.pagenumber.as_deref()).unwrap_or(defaults.page_number),
        }
    }

    /// Requested page size.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Zero-based row offset of the first item on the page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    /// 1-based page number.
    #[must_use]
    pub fn page_number(&self) -> i64 {
        self.page_number
    }
}

fn positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok()).filter(|v| *v > 0)
}
