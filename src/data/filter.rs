use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::model::{Dataset, Listing};

// ---------------------------------------------------------------------------
// FilterRange – a closed interval on one field
// ---------------------------------------------------------------------------

/// Rejected filter input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("invalid {field} range: min {min} is greater than max {max}")]
    InvalidRange {
        field: &'static str,
        min: String,
        max: String,
    },
}

/// Inclusive `[min, max]` bound pair. `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterRange<T> {
    min: T,
    max: T,
}

impl<T: PartialOrd + Copy + fmt::Display> FilterRange<T> {
    /// Build a range, rejecting inverted or unordered (NaN) bounds.
    pub fn new(field: &'static str, min: T, max: T) -> Result<Self, FilterError> {
        // Unordered (NaN) bounds compare as `None`.
        match min.partial_cmp(&max) {
            Some(Ordering::Less | Ordering::Equal) => Ok(FilterRange { min, max }),
            _ => Err(FilterError::InvalidRange {
                field,
                min: min.to_string(),
                max: max.to_string(),
            }),
        }
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

// ---------------------------------------------------------------------------
// FilterSet – conjunction of per-field ranges
// ---------------------------------------------------------------------------

/// One optional range per filterable field. `None` leaves the field
/// unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterSet {
    pub price: Option<FilterRange<f64>>,
    pub bedrooms: Option<FilterRange<u32>>,
    pub bathrooms: Option<FilterRange<f64>>,
}

impl FilterSet {
    /// Whether a listing satisfies every active range.
    ///
    /// A listing without a usable price never satisfies an active price range.
    pub fn matches(&self, listing: &Listing) -> bool {
        let price_ok = match (&self.price, listing.price) {
            (None, _) => true,
            (Some(range), Some(price)) => range.contains(price),
            (Some(_), None) => false,
        };
        price_ok
            && self
                .bedrooms
                .map_or(true, |r| r.contains(listing.bedrooms))
            && self
                .bathrooms
                .map_or(true, |r| r.contains(listing.bathrooms))
    }

    /// No field is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.price.is_none() && self.bedrooms.is_none() && self.bathrooms.is_none()
    }
}

// ---------------------------------------------------------------------------
// FilteredView – the rows passing a FilterSet
// ---------------------------------------------------------------------------

/// A subsequence of a shared [`Dataset`], kept as ascending row indices so
/// the view owns no listing data.
#[derive(Debug, Clone)]
pub struct FilteredView {
    dataset: Arc<Dataset>,
    indices: Vec<usize>,
}

impl FilteredView {
    /// The unfiltered view over every listing.
    pub fn full(dataset: &Arc<Dataset>) -> Self {
        FilteredView {
            dataset: Arc::clone(dataset),
            indices: (0..dataset.len()).collect(),
        }
    }

    /// Narrow this view to the rows that also pass `filters`.
    pub fn apply(&self, filters: &FilterSet) -> Self {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| filters.matches(&self.dataset.listings[i]))
            .collect();
        FilteredView {
            dataset: Arc::clone(&self.dataset),
            indices,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over the listings in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &Listing> + '_ {
        self.indices.iter().map(|&i| &self.dataset.listings[i])
    }
}

impl PartialEq for FilteredView {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.dataset, &other.dataset) && self.indices == other.indices
    }
}

/// Return the listings of `dataset` that pass all active filters.
pub fn apply_filters(dataset: &Arc<Dataset>, filters: &FilterSet) -> FilteredView {
    if filters.is_unconstrained() {
        return FilteredView::full(dataset);
    }
    FilteredView::full(dataset).apply(filters)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;

    fn sample() -> Arc<Dataset> {
        Arc::new(Dataset::from_listings(
            vec![
                listing(1, 100.0, 50.0, 2, 1.0),
                listing(2, 300.0, 100.0, 2, 2.0),
                listing(3, 200.0, 0.0, 3, 1.0),
                listing(4, 450.0, 120.0, 4, 2.5),
                listing(5, 150.0, 80.0, 1, 1.5),
            ],
            Vec::new(),
        ))
    }

    fn ranges(price: (f64, f64), bed: (u32, u32), bath: (f64, f64)) -> FilterSet {
        FilterSet {
            price: Some(FilterRange::new("price", price.0, price.1).unwrap()),
            bedrooms: Some(FilterRange::new("bedrooms", bed.0, bed.1).unwrap()),
            bathrooms: Some(FilterRange::new("bathrooms", bath.0, bath.1).unwrap()),
        }
    }

    fn ids(view: &FilteredView) -> Vec<i64> {
        view.iter().map(|l| l.id).collect()
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = FilterRange::new("price", 10.0, 5.0).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidRange {
                field: "price",
                min: "10".to_string(),
                max: "5".to_string(),
            }
        );
        assert!(FilterRange::new("price", f64::NAN, 5.0).is_err());
        assert!(FilterRange::new("bedrooms", 3u32, 2u32).is_err());
    }

    #[test]
    fn degenerate_range_selects_a_single_value() {
        let r = FilterRange::new("bedrooms", 3u32, 3u32).unwrap();
        assert!(r.contains(3));
        assert!(!r.contains(2));
        assert!(!r.contains(4));
    }

    #[test]
    fn bounds_are_inclusive() {
        let ds = sample();
        let view = apply_filters(&ds, &ranges((100.0, 300.0), (2, 3), (1.0, 2.0)));
        assert_eq!(ids(&view), vec![1, 2, 3]);
    }

    #[test]
    fn unconstrained_fields_always_pass() {
        let ds = sample();
        let filters = FilterSet {
            bedrooms: Some(FilterRange::new("bedrooms", 2, 2).unwrap()),
            ..FilterSet::default()
        };
        assert_eq!(ids(&apply_filters(&ds, &filters)), vec![1, 2]);
        assert_eq!(apply_filters(&ds, &FilterSet::default()).len(), ds.len());
    }

    #[test]
    fn missing_price_fails_an_active_price_range() {
        let mut no_price = listing(9, 0.0, 10.0, 2, 1.0);
        no_price.price = None;
        let ds = Arc::new(Dataset::from_listings(vec![no_price], Vec::new()));

        let priced = FilterSet {
            price: Some(FilterRange::new("price", 0.0, f64::MAX).unwrap()),
            ..FilterSet::default()
        };
        assert!(apply_filters(&ds, &priced).is_empty());
        assert_eq!(apply_filters(&ds, &FilterSet::default()).len(), 1);
    }

    #[test]
    fn view_is_sound_and_complete() {
        let ds = sample();
        let filters = ranges((120.0, 400.0), (1, 3), (1.0, 2.0));
        let view = apply_filters(&ds, &filters);

        for l in view.iter() {
            assert!(filters.matches(l), "{l} should not be in the view");
        }
        let kept = ids(&view);
        for l in ds.listings.iter().filter(|l| !kept.contains(&l.id)) {
            assert!(!filters.matches(l), "{l} should be in the view");
        }
        assert_eq!(kept, vec![2, 3, 5]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = sample();
        let filters = ranges((120.0, 400.0), (1, 3), (1.0, 2.0));
        let once = apply_filters(&ds, &filters);
        let twice = once.apply(&filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn out_of_range_filter_yields_empty_view() {
        let ds = sample();
        let view = apply_filters(&ds, &ranges((1_000_000.0, 2_000_000.0), (0, 10), (0.0, 10.0)));
        assert!(view.is_empty());
        assert_eq!(view.iter().count(), 0);
    }
}
