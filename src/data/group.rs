use std::collections::BTreeMap;
use std::fmt;

use super::filter::FilteredView;
use super::model::Listing;
use super::stats;

// ---------------------------------------------------------------------------
// Grouping parameters
// ---------------------------------------------------------------------------

/// Which field partitions the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Bedrooms,
    Zipcode,
}

/// Statistic each group's prices reduce to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Median,
    Mean,
}

/// Presentation order of the reduced series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesOrder {
    KeyAscending,
    /// Largest value first; equal values by ascending key, undefined last.
    ValueDescending,
}

/// A group key. Bedroom counts order numerically, zip codes lexically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Count(u32),
    Code(String),
}

impl GroupKey {
    fn of(listing: &Listing, by: GroupBy) -> Self {
        match by {
            GroupBy::Bedrooms => GroupKey::Count(listing.bedrooms),
            GroupBy::Zipcode => GroupKey::Code(listing.zipcode.clone()),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Count(n) => write!(f, "{n}"),
            GroupKey::Code(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// GroupedSeries
// ---------------------------------------------------------------------------

/// One bar of a grouped chart.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPoint {
    pub key: GroupKey,
    /// Reduced price; `None` when no row in the group had a usable price.
    pub value: Option<f64>,
    /// Rows in the group, including those without a usable price.
    pub count: usize,
}

/// Ordered key → statistic series driving a bar chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupedSeries {
    pub points: Vec<GroupPoint>,
}

impl GroupedSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of the group sizes.
    pub fn total_count(&self) -> usize {
        self.points.iter().map(|p| p.count).sum()
    }
}

/// Partition the view by `by`, reduce each group's prices with `reducer`,
/// and order the result.
pub fn group_prices(
    view: &FilteredView,
    by: GroupBy,
    reducer: Reducer,
    order: SeriesOrder,
) -> GroupedSeries {
    let mut groups: BTreeMap<GroupKey, (Vec<f64>, usize)> = BTreeMap::new();
    for listing in view.iter() {
        let (prices, count) = groups.entry(GroupKey::of(listing, by)).or_default();
        *count += 1;
        if let Some(p) = listing.price.filter(|p| p.is_finite()) {
            prices.push(p);
        }
    }

    // BTreeMap iteration already yields ascending keys.
    let mut points: Vec<GroupPoint> = groups
        .into_iter()
        .map(|(key, (mut prices, count))| {
            let value = match reducer {
                Reducer::Median => stats::median(&mut prices),
                Reducer::Mean => stats::mean(&prices),
            };
            GroupPoint { key, value, count }
        })
        .collect();

    if order == SeriesOrder::ValueDescending {
        points.sort_by(|a, b| match (a.value, b.value) {
            (Some(x), Some(y)) => y.total_cmp(&x).then_with(|| a.key.cmp(&b.key)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.key.cmp(&b.key),
        });
    }

    GroupedSeries { points }
}

/// Median price per bedroom count, ascending by bedrooms.
pub fn median_price_by_bedrooms(view: &FilteredView) -> GroupedSeries {
    group_prices(view, GroupBy::Bedrooms, Reducer::Median, SeriesOrder::KeyAscending)
}

/// Mean price per zip code, most expensive first.
pub fn mean_price_by_zipcode(view: &FilteredView) -> GroupedSeries {
    group_prices(view, GroupBy::Zipcode, Reducer::Mean, SeriesOrder::ValueDescending)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::filter::{apply_filters, FilterRange, FilterSet};
    use crate::data::model::tests::listing;
    use crate::data::model::Dataset;

    fn zoned(id: i64, price: f64, bedrooms: u32, zipcode: &str) -> Listing {
        let mut l = listing(id, price, 100.0, bedrooms, 1.0);
        l.zipcode = zipcode.to_string();
        l
    }

    fn view() -> FilteredView {
        let ds = Arc::new(Dataset::from_listings(
            vec![
                zoned(1, 100.0, 3, "98001"),
                zoned(2, 300.0, 2, "98004"),
                zoned(3, 200.0, 3, "98001"),
                zoned(4, 700.0, 3, "98004"),
                zoned(5, 400.0, 10, "98039"),
                zoned(6, 250.0, 2, "98002"),
            ],
            Vec::new(),
        ));
        apply_filters(&ds, &FilterSet::default())
    }

    #[test]
    fn bedrooms_series_is_median_by_ascending_key() {
        let series = median_price_by_bedrooms(&view());
        let got: Vec<(GroupKey, Option<f64>)> =
            series.points.iter().map(|p| (p.key.clone(), p.value)).collect();
        assert_eq!(
            got,
            vec![
                (GroupKey::Count(2), Some(275.0)),
                (GroupKey::Count(3), Some(200.0)),
                (GroupKey::Count(10), Some(400.0)),
            ]
        );
    }

    #[test]
    fn zipcode_series_is_mean_by_descending_value() {
        let series = mean_price_by_zipcode(&view());
        let keys: Vec<String> = series.points.iter().map(|p| p.key.to_string()).collect();
        assert_eq!(keys, vec!["98004", "98039", "98002", "98001"]);
        assert_eq!(series.points[0].value, Some(500.0));
        assert_eq!(series.points[3].value, Some(150.0));
    }

    #[test]
    fn group_counts_sum_to_view_size() {
        let v = view();
        assert_eq!(median_price_by_bedrooms(&v).total_count(), v.len());
        assert_eq!(mean_price_by_zipcode(&v).total_count(), v.len());
    }

    #[test]
    fn single_member_group_reduces_to_its_value() {
        let series = mean_price_by_zipcode(&view());
        let p = series
            .points
            .iter()
            .find(|p| p.key == GroupKey::Code("98039".into()))
            .unwrap();
        assert_eq!((p.value, p.count), (Some(400.0), 1));
    }

    #[test]
    fn group_without_prices_is_counted_and_sorted_last() {
        let mut unpriced = zoned(7, 0.0, 1, "98000");
        unpriced.price = None;
        let ds = Arc::new(Dataset::from_listings(
            vec![unpriced, zoned(8, 10.0, 1, "98100")],
            Vec::new(),
        ));
        let series = mean_price_by_zipcode(&apply_filters(&ds, &FilterSet::default()));
        assert_eq!(series.points.last().unwrap().key, GroupKey::Code("98000".into()));
        assert_eq!(series.points.last().unwrap().value, None);
        assert_eq!(series.total_count(), 2);
    }

    #[test]
    fn empty_view_gives_empty_series() {
        let filters = FilterSet {
            price: Some(FilterRange::new("price", 1_000_000.0, 2_000_000.0).unwrap()),
            ..FilterSet::default()
        };
        let empty = view().apply(&filters);
        assert!(median_price_by_bedrooms(&empty).is_empty());
        assert!(mean_price_by_zipcode(&empty).is_empty());
    }
}
