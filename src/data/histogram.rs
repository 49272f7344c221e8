use super::filter::FilteredView;

/// Default bin count of the price distribution chart.
pub const DEFAULT_BINS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Equal-width bins over the finite prices of the view. The maximum price
/// lands in the last bin; identical prices collapse into a single bin.
pub fn price_histogram(view: &FilteredView, bins: usize) -> Histogram {
    let prices: Vec<f64> = view
        .iter()
        .filter_map(|l| l.price)
        .filter(|p| p.is_finite())
        .collect();
    let Some(&first) = prices.first() else {
        return Histogram::default();
    };
    let (lo, hi) = prices
        .iter()
        .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));

    if lo == hi {
        return Histogram {
            bins: vec![HistogramBin {
                start: lo,
                end: hi,
                count: prices.len(),
            }],
        };
    }

    let n = bins.max(1);
    let width = (hi - lo) / n as f64;
    let mut counts = vec![0usize; n];
    for p in &prices {
        let slot = (((p - lo) / width) as usize).min(n - 1);
        counts[slot] += 1;
    }

    Histogram {
        bins: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: lo + i as f64 * width,
                end: if i + 1 == n { hi } else { lo + (i + 1) as f64 * width },
                count,
            })
            .collect(),
    }
}
