use std::sync::Arc;

use super::filter::{apply_filters, FilterSet, FilteredView};
use super::group::{mean_price_by_zipcode, median_price_by_bedrooms, GroupedSeries};
use super::histogram::{price_histogram, Histogram};
use super::model::Dataset;
use super::rank::{rank_best_value, Ranking, TOP_N};
use super::stats::{summarize, Aggregate, Commentary};

/// Everything one render pass needs, derived from a single filtered view.
#[derive(Debug, Clone)]
pub struct Insights {
    pub view: FilteredView,
    pub aggregate: Aggregate,
    pub commentary: Option<Commentary>,
    pub ranking: Ranking,
    pub by_bedrooms: GroupedSeries,
    pub by_zipcode: GroupedSeries,
    pub histogram: Histogram,
}

impl Insights {
    /// Filter the dataset and derive every output from the result.
    pub fn compute(dataset: &Arc<Dataset>, filters: &FilterSet, histogram_bins: usize) -> Self {
        Self::from_view(apply_filters(dataset, filters), histogram_bins)
    }

    /// Derive every output from an existing view.
    pub fn from_view(view: FilteredView, histogram_bins: usize) -> Self {
        let aggregate = summarize(&view);
        let commentary = aggregate
            .summary()
            .and_then(|s| Commentary::classify(s, &view.dataset().baseline));
        let ranking = rank_best_value(&view, TOP_N);
        let by_bedrooms = median_price_by_bedrooms(&view);
        let by_zipcode = mean_price_by_zipcode(&view);
        let histogram = price_histogram(&view, histogram_bins);

        log::debug!(
            "recomputed insights: {} of {} listings, {} ranked ({} without price per area)",
            view.len(),
            view.dataset().len(),
            ranking.entries.len(),
            ranking.excluded
        );

        Insights {
            view,
            aggregate,
            commentary,
            ranking,
            by_bedrooms,
            by_zipcode,
            histogram,
        }
    }

    /// No listing passed the filters.
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterRange;
    use crate::data::histogram::DEFAULT_BINS;
    use crate::data::model::tests::listing;

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::from_listings(
            vec![
                listing(1, 100.0, 50.0, 2, 1.0),
                listing(2, 300.0, 100.0, 2, 2.0),
                listing(3, 200.0, 0.0, 3, 1.0),
            ],
            Vec::new(),
        ))
    }

    #[test]
    fn worked_example_end_to_end() {
        let ds = dataset();
        let filters = FilterSet {
            price: Some(FilterRange::new("price", 0.0, 300.0).unwrap()),
            bedrooms: Some(FilterRange::new("bedrooms", 2, 3).unwrap()),
            bathrooms: Some(FilterRange::new("bathrooms", 1.0, 2.0).unwrap()),
        };
        let insights = Insights::compute(&ds, &filters, DEFAULT_BINS);

        assert_eq!(insights.view.len(), 3);
        let s = insights.aggregate.summary().unwrap();
        assert_eq!(s.price.mean(), Some(200.0));
        assert_eq!(s.price.median(), Some(200.0));
        let ranked: Vec<(i64, f64)> = insights
            .ranking
            .entries
            .iter()
            .map(|e| (e.listing.id, e.price_per_area))
            .collect();
        assert_eq!(ranked, vec![(1, 2.0), (2, 3.0)]);
        assert_eq!(insights.by_bedrooms.total_count(), 3);
        assert_eq!(insights.commentary, Some(Commentary::AtOrAboveMarket));
        assert_eq!(insights.histogram.total(), 3);
    }

    #[test]
    fn empty_selection_reports_no_data_everywhere() {
        let ds = dataset();
        let filters = FilterSet {
            price: Some(FilterRange::new("price", 1_000_000.0, 2_000_000.0).unwrap()),
            ..FilterSet::default()
        };
        let insights = Insights::compute(&ds, &filters, DEFAULT_BINS);

        assert!(insights.is_empty());
        assert_eq!(insights.aggregate, Aggregate::NoData);
        assert_eq!(insights.commentary, None);
        assert!(insights.ranking.entries.is_empty());
        assert!(insights.by_bedrooms.is_empty());
        assert!(insights.by_zipcode.is_empty());
        assert!(insights.histogram.is_empty());
    }

    #[test]
    fn baseline_is_not_taken_from_the_filtered_view() {
        let ds = dataset();
        let filters = FilterSet {
            price: Some(FilterRange::new("price", 250.0, 300.0).unwrap()),
            ..FilterSet::default()
        };
        let insights = Insights::compute(&ds, &filters, DEFAULT_BINS);
        // Filtered mean 300 against the unfiltered 200.
        assert_eq!(insights.commentary, Some(Commentary::AtOrAboveMarket));
        assert_eq!(insights.view.dataset().baseline.mean_price, Some(200.0));

        let cheap = FilterSet {
            price: Some(FilterRange::new("price", 0.0, 150.0).unwrap()),
            ..FilterSet::default()
        };
        let insights = Insights::compute(&ds, &cheap, DEFAULT_BINS);
        assert_eq!(insights.commentary, Some(Commentary::BelowMarket));
    }
}
