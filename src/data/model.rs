use std::fmt;

use super::stats;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Columns every input file must provide, in canonical export order.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "id",
    "price",
    "bedrooms",
    "bathrooms",
    "sqft_living",
    "lat",
    "long",
    "zipcode",
    "grade",
];

// ---------------------------------------------------------------------------
// Listing – one row of the table
// ---------------------------------------------------------------------------

/// A single real-estate listing.
///
/// `price` and `sqft_living` are optional: cells that are empty or not a
/// finite number load as `None` and are excluded from statistics instead of
/// failing the whole file.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: i64,
    pub price: Option<f64>,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub sqft_living: Option<f64>,
    pub lat: f64,
    pub long: f64,
    pub zipcode: String,
    pub grade: u32,
    /// Cells of any further input columns, aligned with
    /// [`Dataset::extra_columns`].
    pub extra: Vec<String>,
}

impl Listing {
    /// `price / sqft_living`, or `None` when the ratio is undefined
    /// (missing values, area ≤ 0, or a non-finite result).
    pub fn price_per_area(&self) -> Option<f64> {
        let price = self.price?;
        let area = self.sqft_living?;
        if area <= 0.0 {
            return None;
        }
        let ratio = price / area;
        ratio.is_finite().then_some(ratio)
    }
}

// ---------------------------------------------------------------------------
// RawTable – untyped cells produced by the loaders
// ---------------------------------------------------------------------------

/// A header row plus string cells, the common output of every file format.
/// Empty strings stand for missing values.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Error while turning raw cells into typed listings.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("input is missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': '{value}' is not a valid {expected}")]
    InvalidCell {
        row: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Load-time context
// ---------------------------------------------------------------------------

/// Market-wide reference values computed once from the unfiltered dataset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MarketBaseline {
    /// Mean of all finite prices; `None` when the dataset has none.
    pub mean_price: Option<f64>,
}

/// Observed min/max of the filterable fields, used as slider limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetBounds {
    pub price: (f64, f64),
    pub bedrooms: (u32, u32),
    pub bathrooms: (f64, f64),
}

impl Default for DatasetBounds {
    fn default() -> Self {
        Self {
            price: (0.0, 0.0),
            bedrooms: (0, 0),
            bathrooms: (0.0, 0.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All listings plus read-only context computed at load time.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub listings: Vec<Listing>,
    /// Names of input columns outside [`REQUIRED_COLUMNS`], in file order.
    pub extra_columns: Vec<String>,
    pub baseline: MarketBaseline,
    pub bounds: DatasetBounds,
}

impl Dataset {
    /// Build a dataset from listings, computing baseline and bounds.
    pub fn from_listings(listings: Vec<Listing>, extra_columns: Vec<String>) -> Self {
        let prices: Vec<f64> = listings
            .iter()
            .filter_map(|l| l.price)
            .filter(|p| p.is_finite())
            .collect();
        let baseline = MarketBaseline {
            mean_price: stats::mean(&prices),
        };
        let bounds = DatasetBounds::observe(&listings);

        Dataset {
            listings,
            extra_columns,
            baseline,
            bounds,
        }
    }

    /// Parse a [`RawTable`] into typed listings.
    pub fn from_raw(table: RawTable) -> Result<Self, SchemaError> {
        let index = ColumnIndex::resolve(&table.headers)?;
        let extra_columns: Vec<String> = index
            .extra
            .iter()
            .map(|&i| table.headers[i].clone())
            .collect();

        let listings = table
            .rows
            .iter()
            .enumerate()
            .map(|(row_no, cells)| index.listing(row_no, cells))
            .collect::<Result<Vec<_>, _>>()?;

        let missing_price = listings.iter().filter(|l| l.price.is_none()).count();
        let missing_area = listings.iter().filter(|l| l.sqft_living.is_none()).count();
        if missing_price > 0 || missing_area > 0 {
            log::warn!(
                "{missing_price} listings without a usable price, {missing_area} without a usable living area"
            );
        }

        Ok(Self::from_listings(listings, extra_columns))
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl DatasetBounds {
    fn observe(listings: &[Listing]) -> Self {
        let Some(first) = listings.first() else {
            return Self::default();
        };
        let mut bounds = DatasetBounds {
            price: (f64::INFINITY, f64::NEG_INFINITY),
            bedrooms: (first.bedrooms, first.bedrooms),
            bathrooms: (first.bathrooms, first.bathrooms),
        };
        for l in listings {
            if let Some(p) = l.price.filter(|p| p.is_finite()) {
                bounds.price.0 = bounds.price.0.min(p);
                bounds.price.1 = bounds.price.1.max(p);
            }
            bounds.bedrooms.0 = bounds.bedrooms.0.min(l.bedrooms);
            bounds.bedrooms.1 = bounds.bedrooms.1.max(l.bedrooms);
            bounds.bathrooms.0 = bounds.bathrooms.0.min(l.bathrooms);
            bounds.bathrooms.1 = bounds.bathrooms.1.max(l.bathrooms);
        }
        if bounds.price.0 > bounds.price.1 {
            bounds.price = (0.0, 0.0);
        }
        bounds
    }
}

// ---------------------------------------------------------------------------
// Header resolution and cell parsing
// ---------------------------------------------------------------------------

/// Positions of the required columns within a header row.
struct ColumnIndex {
    required: [usize; REQUIRED_COLUMNS.len()],
    extra: Vec<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, SchemaError> {
        let mut required = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))?;
        }
        let extra = (0..headers.len())
            .filter(|i| !required.contains(i))
            .collect();
        Ok(ColumnIndex { required, extra })
    }

    fn listing(&self, row: usize, cells: &[String]) -> Result<Listing, SchemaError> {
        let cell = move |col: usize| Cell {
            row,
            column: REQUIRED_COLUMNS[col],
            text: cells
                .get(self.required[col])
                .map(|s| s.trim())
                .unwrap_or(""),
        };

        let zipcode = cell(7).text;
        if zipcode.is_empty() {
            return Err(cell(7).invalid("zipcode"));
        }

        Ok(Listing {
            id: cell(0).integer()?,
            price: cell(1).optional_non_negative(),
            bedrooms: cell(2).count()?,
            bathrooms: cell(3).number()?,
            sqft_living: cell(4).optional_non_negative(),
            lat: cell(5).number()?,
            long: cell(6).number()?,
            // Numeric sources may render zip codes as "98178.0".
            zipcode: zipcode.strip_suffix(".0").unwrap_or(zipcode).to_string(),
            grade: cell(8).count()?,
            extra: self
                .extra
                .iter()
                .map(|&i| cells.get(i).cloned().unwrap_or_default())
                .collect(),
        })
    }
}

struct Cell<'a> {
    row: usize,
    column: &'static str,
    text: &'a str,
}

impl Cell<'_> {
    fn invalid(&self, expected: &'static str) -> SchemaError {
        SchemaError::InvalidCell {
            row: self.row,
            column: self.column,
            value: self.text.to_string(),
            expected,
        }
    }

    fn optional_number(&self) -> Option<f64> {
        self.text.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Negative prices and areas are treated like missing ones.
    fn optional_non_negative(&self) -> Option<f64> {
        self.optional_number().filter(|v| *v >= 0.0)
    }

    fn number(&self) -> Result<f64, SchemaError> {
        self.optional_number().ok_or_else(|| self.invalid("number"))
    }

    fn integer(&self) -> Result<i64, SchemaError> {
        if let Ok(i) = self.text.parse::<i64>() {
            return Ok(i);
        }
        match self.optional_number() {
            Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
            _ => Err(self.invalid("integer")),
        }
    }

    /// Non-negative whole number; tolerates float renderings such as `3.0`.
    fn count(&self) -> Result<u32, SchemaError> {
        match self.integer() {
            Ok(i) => u32::try_from(i).map_err(|_| self.invalid("non-negative count")),
            Err(_) => Err(self.invalid("non-negative count")),
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({} bd / {} ba, {})", self.id, self.bedrooms, self.bathrooms, self.zipcode)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
