use anyhow::{Context, Result};

use super::filter::FilteredView;
use super::model::{Listing, REQUIRED_COLUMNS};
use super::rank::RankedEntry;

/// Suggested file name for the recommendation export.
pub const RECOMMENDATIONS_FILE: &str = "house_recommendations.csv";
/// Suggested file name for the full filtered export.
pub const FILTERED_FILE: &str = "filtered_houses.csv";

const RECOMMENDATION_COLUMNS: [&str; 6] = [
    "id",
    "price",
    "bedrooms",
    "bathrooms",
    "sqft_living",
    "price_per_sqft",
];

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn required_cells(l: &Listing) -> [String; REQUIRED_COLUMNS.len()] {
    [
        l.id.to_string(),
        optional(l.price),
        l.bedrooms.to_string(),
        l.bathrooms.to_string(),
        optional(l.sqft_living),
        l.lat.to_string(),
        l.long.to_string(),
        l.zipcode.clone(),
        l.grade.to_string(),
    ]
}

/// CSV bytes of the ranked subset, selected columns only.
pub fn recommendations_csv(entries: &[RankedEntry]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(RECOMMENDATION_COLUMNS)
        .context("writing recommendation header")?;
    for e in entries {
        let l = &e.listing;
        writer
            .write_record([
                l.id.to_string(),
                optional(l.price),
                l.bedrooms.to_string(),
                l.bathrooms.to_string(),
                optional(l.sqft_living),
                e.price_per_area.to_string(),
            ])
            .with_context(|| format!("writing recommendation {}", l.id))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing recommendation CSV: {}", e.error()))
}

/// CSV bytes of every row of the view, all columns including extras.
pub fn filtered_csv(view: &FilteredView) -> Result<Vec<u8>> {
    let extra_columns = &view.dataset().extra_columns;
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(
            REQUIRED_COLUMNS
                .iter()
                .copied()
                .chain(extra_columns.iter().map(String::as_str)),
        )
        .context("writing filtered header")?;
    for l in view.iter() {
        writer
            .write_record(required_cells(l).iter().chain(l.extra.iter()))
            .with_context(|| format!("writing listing {}", l.id))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing filtered CSV: {}", e.error()))
}
