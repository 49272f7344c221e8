use super::filter::FilteredView;
use super::model::Listing;

/// Size of the recommendation list.
pub const TOP_N: usize = 10;

/// A listing with its price per unit of living area.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub listing: Listing,
    pub price_per_area: f64,
}

/// Best-value listings plus how many rows had no defined ratio.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ranking {
    pub entries: Vec<RankedEntry>,
    pub excluded: usize,
}

/// Rank listings by ascending price per area, ties by ascending id, and keep
/// the first `n`. Rows whose ratio is undefined are counted, not ranked.
pub fn rank_best_value(view: &FilteredView, n: usize) -> Ranking {
    let mut excluded = 0;
    let mut candidates: Vec<(&Listing, f64)> = view
        .iter()
        .filter_map(|l| match l.price_per_area() {
            Some(ratio) => Some((l, ratio)),
            None => {
                excluded += 1;
                None
            }
        })
        .collect();

    candidates.sort_by(|(a, ra), (b, rb)| {
        ra.total_cmp(rb).then_with(|| a.id.cmp(&b.id))
    });

    let entries = candidates
        .into_iter()
        .take(n)
        .map(|(listing, price_per_area)| RankedEntry {
            listing: listing.clone(),
            price_per_area,
        })
        .collect();

    Ranking { entries, excluded }
}
