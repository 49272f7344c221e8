use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Points};

use crate::data::group::GroupedSeries;
use crate::data::histogram::Histogram;
use crate::data::insights::Insights;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

/// Colour steps used to bucket map points by price.
const MAP_PRICE_STEPS: usize = 16;

// ---------------------------------------------------------------------------
// Chart section (central panel)
// ---------------------------------------------------------------------------

/// Render every chart for the current insights.
pub fn charts(ui: &mut Ui, state: &AppState, insights: &Insights) {
    ui.strong("Interactive Map of Listings");
    listing_map(ui, state, insights);
    ui.separator();

    ui.strong("Median Price by Bedrooms");
    grouped_bars(ui, "by_bedrooms", "Median Price", &insights.by_bedrooms, false);
    ui.separator();

    ui.strong("Price vs Living Area");
    price_vs_area(ui, state, insights);
    ui.separator();

    ui.strong("Average Price by Zipcode");
    grouped_bars(ui, "by_zipcode", "Average Price", &insights.by_zipcode, true);
    ui.separator();

    ui.strong("Price Distribution");
    price_distribution(ui, &insights.histogram);
}

// ---------------------------------------------------------------------------
// Map – longitude/latitude scatter coloured by price
// ---------------------------------------------------------------------------

fn listing_map(ui: &mut Ui, state: &AppState, insights: &Insights) {
    let Some(scale) = state.price_scale else {
        return;
    };
    let Some(ds) = &state.dataset else {
        return;
    };
    let (lo, hi) = ds.bounds.price;
    let span = (hi - lo).max(f64::EPSILON);

    // One series per price step keeps the number of plot items small.
    let mut buckets: Vec<Vec<[f64; 2]>> = vec![Vec::new(); MAP_PRICE_STEPS];
    for l in insights.view.iter() {
        let Some(price) = l.price else { continue };
        let step = (((price - lo) / span) * MAP_PRICE_STEPS as f64) as usize;
        buckets[step.min(MAP_PRICE_STEPS - 1)].push([l.long, l.lat]);
    }

    Plot::new("listing_map")
        .height(CHART_HEIGHT * 1.5)
        .data_aspect(1.5)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (i, points) in buckets.into_iter().enumerate() {
                if points.is_empty() {
                    continue;
                }
                let bucket_price = lo + span * (i as f64 + 0.5) / MAP_PRICE_STEPS as f64;
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .color(scale.color_for(bucket_price))
                        .radius(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Bars in series order. Bedroom keys sit at their numeric value; zip codes
/// at their position, labelled through the axis formatter.
fn grouped_bars(
    ui: &mut Ui,
    id: &str,
    name: &str,
    series: &GroupedSeries,
    positional: bool,
) {
    if series.is_empty() {
        ui.label("No data for the current selection.");
        return;
    }
    let labels: Vec<String> = series.points.iter().map(|p| p.key.to_string()).collect();
    let bars: Vec<Bar> = series
        .points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let value = p.value?;
            let x = if positional {
                i as f64
            } else {
                labels[i].parse::<f64>().unwrap_or(i as f64)
            };
            Some(
                Bar::new(x, value)
                    .width(0.8)
                    .name(format!("{} ({} listings)", labels[i], p.count)),
            )
        })
        .collect();

    let mut plot = Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false);
    if positional {
        plot = plot.x_axis_formatter(move |mark: GridMark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        });
    }

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(BarChart::new(bars).name(name).color(Color32::from_rgb(0, 128, 128)));
    });
}

fn price_distribution(ui: &mut Ui, histogram: &Histogram) {
    if histogram.is_empty() {
        ui.label("No priced listings in the current selection.");
        return;
    }
    let bars: Vec<Bar> = histogram
        .bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width().max(1.0))
                .name(format!("${:.0} – ${:.0}", b.start, b.end))
        })
        .collect();

    Plot::new("price_distribution")
        .height(CHART_HEIGHT)
        .x_axis_label("Price ($)")
        .y_axis_label("Listings")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(format!("Listings ({})", histogram.total()))
                    .color(Color32::from_rgb(0, 128, 128)),
            );
        });
}

// ---------------------------------------------------------------------------
// Scatter – price vs living area, coloured by bedrooms
// ---------------------------------------------------------------------------

fn price_vs_area(ui: &mut Ui, state: &AppState, insights: &Insights) {
    let mut by_bedrooms: BTreeMap<u32, Vec<[f64; 2]>> = BTreeMap::new();
    for l in insights.view.iter() {
        if let (Some(price), Some(area)) = (l.price, l.sqft_living) {
            by_bedrooms.entry(l.bedrooms).or_default().push([area, price]);
        }
    }

    Plot::new("price_vs_area")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Living area (sqft)")
        .y_axis_label("Price ($)")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for (bedrooms, points) in by_bedrooms {
                let color = state
                    .bedroom_colors
                    .as_ref()
                    .map(|c| c.color_for(bedrooms))
                    .unwrap_or(Color32::LIGHT_BLUE);
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(format!("{bedrooms} bd"))
                        .color(color)
                        .radius(2.0),
                );
            }
        });
}
