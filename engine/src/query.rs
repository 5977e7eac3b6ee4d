//! Query builder for the ship list.
//!
//! A [`ShipQuery`] is built from request parameters on the server, serialized
//! back into parameters on the client, and applied to in-memory records by the
//! [`Store`](crate::Store). Storage adapters that run their own query language
//! translate the same structure.
//!
//! Application order is always filter, then sort, then page window.

use crate::{error::Result, Error, Ship};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Page size used when a page index is given without a size.
pub const DEFAULT_PAGE_SIZE: u64 = 2;

/// Largest page size honoured unless configured otherwise.
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 100;

/// Request parameter names.
pub mod params {
    pub const NAME: &str = "name";
    pub const DISPLACEMENT: &str = "displacement";
    pub const SORT_FIELD: &str = "sortField";
    pub const SORT_ORDER: &str = "sortOrder";
    pub const PAGE: &str = "page";
    pub const PAGE_SIZE: &str = "pageSize";
}

/// Page size bounds applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    /// Size used when `pageSize` is absent
    pub default_page_size: u64,
    /// Requested sizes above this are clamped
    pub max_page_size: u64,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

/// Fields a ship list may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Displacement,
}

impl SortField {
    pub const ALL: [SortField; 2] = [SortField::Name, SortField::Displacement];

    /// Parameter spelling.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortField::Name => params::NAME,
            SortField::Displacement => params::DISPLACEMENT,
        }
    }

    /// Parse a `sortField` value. Fields outside the allow-list are rejected.
    pub fn from_param(value: &str) -> Result<Self> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_param() == value)
            .ok_or_else(|| {
                Error::invalid_query(params::SORT_FIELD, format!("cannot sort by '{value}'"))
            })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// `1` for ascending, `-1` for descending.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "1",
            SortOrder::Descending => "-1",
        }
    }

    pub fn from_param(value: &str) -> Result<Self> {
        match value.trim() {
            "1" => Ok(SortOrder::Ascending),
            "-1" => Ok(SortOrder::Descending),
            other => Err(Error::invalid_query(
                params::SORT_ORDER,
                format!("expected 1 or -1, got '{other}'"),
            )),
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// A sort field with its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    pub fn ascending(field: SortField) -> Self {
        Self::new(field, SortOrder::Ascending)
    }

    pub fn descending(field: SortField) -> Self {
        Self::new(field, SortOrder::Descending)
    }

    /// Compare two ships on the sort field alone.
    pub fn compare(&self, a: &Ship, b: &Ship) -> Ordering {
        let ordering = match self.field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Displacement => a.displacement.cmp(&b.displacement),
        };
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Filter over the allow-listed ship fields.
///
/// `name` matches by case-sensitive substring, `displacement` by equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipFilter {
    pub name: Option<String>,
    pub displacement: Option<i64>,
}

impl ShipFilter {
    /// Whether a ship passes every set criterion.
    pub fn matches(&self, ship: &Ship) -> bool {
        let name_ok = self
            .name
            .as_deref()
            .map_or(true, |needle| ship.name.contains(needle));
        let displacement_ok = self
            .displacement
            .map_or(true, |displacement| ship.displacement == displacement);
        name_ok && displacement_ok
    }

    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.displacement.is_none()
    }
}

/// A page index with its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageWindow {
    /// Zero-based page index
    pub index: u64,
    /// Records per page
    pub size: u64,
}

impl PageWindow {
    pub fn new(index: u64, size: u64) -> Self {
        Self { index, size }
    }

    /// Records skipped before this page.
    pub fn offset(&self) -> u64 {
        self.size.saturating_mul(self.index)
    }

    /// Records on this page at most.
    pub fn limit(&self) -> u64 {
        self.size
    }

    /// Number of pages needed to show `total` records.
    pub fn page_count(&self, total: u64) -> u64 {
        if self.size == 0 {
            return 0;
        }
        total.div_ceil(self.size)
    }
}

/// A complete ship list query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipQuery {
    pub filter: ShipFilter,
    /// Unsorted lists come back in key order
    pub sort: Option<Sort>,
    /// No window means the whole filtered, sorted set
    pub page: Option<PageWindow>,
}

impl ShipQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: ShipFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_page(mut self, page: PageWindow) -> Self {
        self.page = Some(page);
        self
    }

    /// Parse request parameters.
    ///
    /// Unknown parameters are ignored, as are empty values. A repeated
    /// parameter keeps its last value. `pageSize` only matters alongside
    /// `page`; without `page` the full set is returned.
    pub fn from_params<I, K, V>(params: I, limits: &QueryLimits) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw = RawParams::default();
        for (key, value) in params {
            let value = value.as_ref();
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                params::NAME => &mut raw.name,
                params::DISPLACEMENT => &mut raw.displacement,
                params::SORT_FIELD => &mut raw.sort_field,
                params::SORT_ORDER => &mut raw.sort_order,
                params::PAGE => &mut raw.page,
                params::PAGE_SIZE => &mut raw.page_size,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }

        let filter = ShipFilter {
            name: raw.name,
            displacement: raw
                .displacement
                .as_deref()
                .map(|value| parse_int::<i64>(params::DISPLACEMENT, value))
                .transpose()?,
        };

        let order = raw
            .sort_order
            .as_deref()
            .map(SortOrder::from_param)
            .transpose()?
            .unwrap_or_default();
        let sort = raw
            .sort_field
            .as_deref()
            .map(|value| SortField::from_param(value.trim()))
            .transpose()?
            .map(|field| Sort::new(field, order));

        let size = match raw.page_size.as_deref() {
            Some(value) => {
                let size = parse_int::<u64>(params::PAGE_SIZE, value)?;
                if size == 0 {
                    return Err(Error::invalid_query(params::PAGE_SIZE, "must be positive"));
                }
                size.min(limits.max_page_size)
            }
            None => limits.default_page_size,
        };

        let page = raw
            .page
            .as_deref()
            .map(|value| parse_int::<u64>(params::PAGE, value))
            .transpose()?
            .map(|index| {
                // Storage offsets are signed 64-bit.
                index
                    .checked_mul(size)
                    .filter(|offset| i64::try_from(*offset).is_ok())
                    .map(|_| PageWindow::new(index, size))
                    .ok_or_else(|| Error::invalid_query(params::PAGE, "out of range"))
            })
            .transpose()?;

        Ok(Self { filter, sort, page })
    }

    /// Serialize into request parameters. Unset parts are omitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(name) = &self.filter.name {
            out.push((params::NAME, name.clone()));
        }
        if let Some(displacement) = self.filter.displacement {
            out.push((params::DISPLACEMENT, displacement.to_string()));
        }
        if let Some(sort) = &self.sort {
            out.push((params::SORT_FIELD, sort.field.as_param().to_string()));
            out.push((params::SORT_ORDER, sort.order.as_param().to_string()));
        }
        if let Some(page) = &self.page {
            out.push((params::PAGE, page.index.to_string()));
            out.push((params::PAGE_SIZE, page.size.to_string()));
        }
        out
    }

    /// Run the query over in-memory ships.
    pub fn apply<'a, I>(&self, ships: I) -> Vec<&'a Ship>
    where
        I: IntoIterator<Item = &'a Ship>,
    {
        let mut matched: Vec<&Ship> = ships
            .into_iter()
            .filter(|ship| self.filter.matches(ship))
            .collect();

        matched.sort_by(|a, b| {
            self.sort
                .map_or(Ordering::Equal, |sort| sort.compare(a, b))
                .then(a.ship_id.cmp(&b.ship_id))
        });

        match self.page {
            Some(window) => matched
                .into_iter()
                .skip(usize::try_from(window.offset()).unwrap_or(usize::MAX))
                .take(usize::try_from(window.limit()).unwrap_or(usize::MAX))
                .collect(),
            None => matched,
        }
    }
}

/// One page of list results and the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub count: u64,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>, count: u64) -> Self {
        Self { records, count }
    }

    /// No records, zero count.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            count: 0,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Default)]
struct RawParams {
    name: Option<String>,
    displacement: Option<String>,
    sort_field: Option<String>,
    sort_order: Option<String>,
    page: Option<String>,
    page_size: Option<String>,
}

fn parse_int<T: std::str::FromStr>(param: &'static str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::invalid_query(param, format!("expected an integer, got '{value}'")))
}
