use super::filter::FilteredView;
use super::model::MarketBaseline;

// ---------------------------------------------------------------------------
// Primitive reductions
// ---------------------------------------------------------------------------

/// Arithmetic mean, `None` for an empty slice. Summed in ascending order so
/// the result does not depend on the order of `values`.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted.iter().sum::<f64>() / sorted.len() as f64)
}

/// Median, `None` for an empty slice. Sorts `values` in place; an even count
/// averages the two middle values.
pub fn median(values: &mut [f64]) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    values.sort_by(f64::total_cmp);
    if n % 2 == 0 {
        Some((values[n / 2 - 1] + values[n / 2]) / 2.0)
    } else {
        Some(values[n / 2])
    }
}

// ---------------------------------------------------------------------------
// Per-column statistics
// ---------------------------------------------------------------------------

/// Mean and median of the usable values of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Central {
    pub mean: f64,
    pub median: f64,
}

/// Statistics of one column over a view, with the number of rows left out
/// because the value was missing or non-finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    /// `None` when no row had a usable value.
    pub central: Option<Central>,
    pub used: usize,
    pub excluded: usize,
}

impl ColumnStats {
    pub fn compute(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let mut usable = Vec::new();
        let mut excluded = 0;
        for v in values {
            match v {
                Some(v) if v.is_finite() => usable.push(v),
                _ => excluded += 1,
            }
        }
        let central = mean(&usable)
            .zip(median(&mut usable))
            .map(|(mean, median)| Central { mean, median });
        ColumnStats {
            central,
            used: usable.len(),
            excluded,
        }
    }

    pub fn mean(&self) -> Option<f64> {
        self.central.map(|c| c.mean)
    }

    pub fn median(&self) -> Option<f64> {
        self.central.map(|c| c.median)
    }
}

// ---------------------------------------------------------------------------
// Aggregate summary
// ---------------------------------------------------------------------------

/// KPI figures for a non-empty view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateSummary {
    pub count: usize,
    pub price: ColumnStats,
    pub living_area: ColumnStats,
}

/// Result of [`summarize`]: either figures or an explicit "no data" marker,
/// never NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregate {
    NoData,
    Summary(AggregateSummary),
}

impl Aggregate {
    pub fn summary(&self) -> Option<&AggregateSummary> {
        match self {
            Aggregate::NoData => None,
            Aggregate::Summary(s) => Some(s),
        }
    }
}

/// Count, price mean/median and living-area mean/median over a view.
pub fn summarize(view: &FilteredView) -> Aggregate {
    if view.is_empty() {
        return Aggregate::NoData;
    }
    let price = ColumnStats::compute(view.iter().map(|l| l.price));
    let living_area = ColumnStats::compute(view.iter().map(|l| l.sqft_living));
    if price.excluded > 0 || living_area.excluded > 0 {
        log::debug!(
            "summary excluded {} prices and {} living areas",
            price.excluded,
            living_area.excluded
        );
    }
    Aggregate::Summary(AggregateSummary {
        count: view.len(),
        price,
        living_area,
    })
}

// ---------------------------------------------------------------------------
// Commentary against the market baseline
// ---------------------------------------------------------------------------

/// Where the filtered selection sits relative to the whole market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commentary {
    BelowMarket,
    AtOrAboveMarket,
}

impl Commentary {
    /// Compare the filtered mean price with the unfiltered baseline.
    /// `None` when either mean is undefined.
    pub fn classify(summary: &AggregateSummary, baseline: &MarketBaseline) -> Option<Self> {
        let filtered = summary.price.mean()?;
        let market = baseline.mean_price?;
        Some(if filtered < market {
            Commentary::BelowMarket
        } else {
            Commentary::AtOrAboveMarket
        })
    }

    pub fn tip(&self) -> &'static str {
        match self {
            Commentary::BelowMarket => {
                "Tip: You are exploring properties below the overall market average."
            }
            Commentary::AtOrAboveMarket => {
                "Tip: You are exploring higher-end properties above the market average."
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::filter::{apply_filters, FilterRange, FilterSet};
    use crate::data::model::tests::listing;
    use crate::data::model::Dataset;

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
    fn median_handles_odd_and_even_counts() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn summary_of_worked_example() {
        let ds = dataset();
        let view = apply_filters(&ds, &FilterSet::default());
        let Aggregate::Summary(s) = summarize(&view) else {
            panic!("expected a summary");
        };
        assert_eq!(s.count, 3);
        assert_eq!(s.price.mean(), Some(200.0));
        assert_eq!(s.price.median(), Some(200.0));
        assert_eq!(s.living_area.mean(), Some(50.0));
        assert_eq!(s.price.excluded, 0);
    }

    #[test]
    fn summary_does_not_depend_on_row_order() {
        let priced = |prices: &[f64]| {
            let listings = prices
                .iter()
                .enumerate()
                .map(|(i, &p)| listing(i as i64, p, 1.0, 2, 1.0))
                .collect();
            let ds = Arc::new(Dataset::from_listings(listings, Vec::new()));
            let summary = *summarize(&apply_filters(&ds, &FilterSet::default()))
                .summary()
                .unwrap();
            (summary, ds.baseline.mean_price)
        };
        let (forward, forward_baseline) = priced(&[0.1, 0.2, 0.3]);
        let (reversed, reversed_baseline) = priced(&[0.3, 0.2, 0.1]);
        assert_eq!(
            forward.price.mean().map(f64::to_bits),
            reversed.price.mean().map(f64::to_bits)
        );
        assert_eq!(
            forward_baseline.map(f64::to_bits),
            reversed_baseline.map(f64::to_bits)
        );
        assert_eq!(mean(&[0.1, 0.2, 0.3]), mean(&[0.3, 0.1, 0.2]));
    }

    #[test]
    fn empty_view_reports_no_data() {
        let ds = dataset();
        let filters = FilterSet {
            price: Some(FilterRange::new("price", 1_000_000.0, 2_000_000.0).unwrap()),
            ..FilterSet::default()
        };
        let agg = summarize(&apply_filters(&ds, &filters));
        assert_eq!(agg, Aggregate::NoData);
        assert!(agg.summary().is_none());
    }

    #[test]
    fn missing_values_are_excluded_and_counted() {
        let mut a = listing(1, 100.0, 50.0, 2, 1.0);
        a.sqft_living = None;
        let mut b = listing(2, 300.0, 100.0, 2, 1.0);
        b.price = None;
        let c = listing(3, 500.0, f64::INFINITY, 2, 1.0);
        let ds = Arc::new(Dataset::from_listings(vec![a, b, c], Vec::new()));

        let Aggregate::Summary(s) = summarize(&apply_filters(&ds, &FilterSet::default())) else {
            panic!("expected a summary");
        };
        assert_eq!(s.count, 3);
        assert_eq!((s.price.used, s.price.excluded), (2, 1));
        assert_eq!(s.price.mean(), Some(300.0));
        assert_eq!((s.living_area.used, s.living_area.excluded), (1, 2));
        assert_eq!(s.living_area.mean(), Some(100.0));
    }

    #[test]
    fn all_values_missing_leaves_central_undefined() {
        let stats = ColumnStats::compute([None, Some(f64::NAN)]);
        assert_eq!(stats.central, None);
        assert_eq!(stats.excluded, 2);
    }

    #[test]
    fn commentary_compares_against_unfiltered_baseline() {
        let ds = dataset();
        let cheap = FilterSet {
            price: Some(FilterRange::new("price", 0.0, 150.0).unwrap()),
            ..FilterSet::default()
        };
        let s = *summarize(&apply_filters(&ds, &cheap)).summary().unwrap();
        assert_eq!(
            Commentary::classify(&s, &ds.baseline),
            Some(Commentary::BelowMarket)
        );

        // The full view equals the baseline, which counts as at/above.
        let all = *summarize(&apply_filters(&ds, &FilterSet::default()))
            .summary()
            .unwrap();
        assert_eq!(
            Commentary::classify(&all, &ds.baseline),
            Some(Commentary::AtOrAboveMarket)
        );

        let no_baseline = MarketBaseline { mean_price: None };
        assert_eq!(Commentary::classify(&all, &no_baseline), None);
    }
}
